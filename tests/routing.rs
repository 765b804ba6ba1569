//! Routing behavior over a compiled resource tree: forward/reverse
//! agreement, bucket partitioning, tie-breaks and link generation failures.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{Method, Request};
use rest_router::http::ApiRequest;
use rest_router::routing::compile::{compile_matchers, compile_paths, walk};
use rest_router::routing::pattern::segment_count;
use rest_router::routing::{Links, Operation, PathParams, Resource, Router, RoutingError};

mod common;

use common::{json_body, named, orders_tree};

fn sample_value(key: &str, placeholder: &str) -> &'static str {
    match (key.starts_with("orders.items."), placeholder) {
        (true, "id") => "sku-7",
        _ => "42",
    }
}

fn params(pairs: &[(&str, &str)]) -> PathParams {
    pairs.iter().copied().collect()
}

#[test]
fn test_every_generated_path_matches_its_own_operation() {
    let router = Router::new(orders_tree(), "cfg").unwrap();
    assert_eq!(router.len(), 13);

    for (key, template) in router.templates() {
        let values: Vec<(&str, &str)> = template
            .placeholders()
            .map(|name| (name, sample_value(key, name)))
            .collect();
        let path = router.path_for(key, &values, &[]).unwrap();
        let method = Operation::from_key(key).unwrap().method();

        let bound = router
            .match_route(&method, &path)
            .unwrap_or_else(|e| panic!("{key} -> {path}: {e}"));
        assert_eq!(&*bound.key, key, "{method} {path}");
        assert_eq!(bound.params.len(), values.len());
        for (name, value) in values {
            assert_eq!(bound.params.get(name), Some(value));
        }
    }
}

#[test]
fn test_matchers_only_match_paths_of_their_segment_count() {
    let routes = walk(&orders_tree()).unwrap();
    let matchers = compile_matchers(&routes).unwrap();
    let templates: HashMap<String, _> = compile_paths(&routes).into_iter().collect();

    for matcher in &matchers {
        let template = &templates[&*matcher.key];
        let values: HashMap<&str, &str> = template
            .placeholders()
            .map(|name| (name, sample_value(&matcher.key, name)))
            .collect();
        let path = template.render(&values).unwrap();
        assert_eq!(segment_count(&path), matcher.segment_count, "{path}");

        for other in matchers.iter().filter(|m| m.segment_count != matcher.segment_count) {
            assert!(!other.pattern.is_match(&path), "{} matched {path}", other.key);
        }
    }
}

#[test]
fn test_segment_count_ignores_empty_segments() {
    assert_eq!(segment_count("/"), 0);
    assert_eq!(segment_count("/orders"), 1);
    assert_eq!(segment_count("/orders/"), 1);
    assert_eq!(segment_count("/orders/42/summary"), 3);

    let router = Router::new(orders_tree(), "cfg").unwrap();
    assert!(router.match_route(&Method::GET, "/orders/42/extra").is_err());
    assert!(router.match_route(&Method::GET, "/orders//42").is_err());
}

#[test]
fn test_first_declared_resource_wins() {
    // `/orders/latest` is both the grouping node's `latest` singleton and an
    // `orders` entity with a permissive id.
    let grouped_first = Resource::root()
        .resource(Resource::singleton("orders").resource(Resource::singleton("latest").read(named("latest"))))
        .resource(Resource::entity("orders", r"\w+").read(named("by-id")));
    let entity_first = Resource::root()
        .resource(Resource::entity("orders", r"\w+").read(named("by-id")))
        .resource(Resource::singleton("orders").resource(Resource::singleton("latest").read(named("latest"))));

    let router = Router::new(grouped_first, "cfg").unwrap();
    for _ in 0..3 {
        let bound = router.match_route(&Method::GET, "/orders/latest").unwrap();
        assert_eq!(&*bound.key, "orders.latest.read");
        assert!(bound.params.is_empty());
    }
    let bound = router.match_route(&Method::GET, "/orders/42").unwrap();
    assert_eq!(&*bound.key, "orders.read");

    let router = Router::new(entity_first, "cfg").unwrap();
    for _ in 0..3 {
        let bound = router.match_route(&Method::GET, "/orders/latest").unwrap();
        assert_eq!(&*bound.key, "orders.read");
        assert_eq!(bound.params, params(&[("id", "latest")]));
    }
}

/// Run the bound handler for `GET path` and return the handler name it reports.
async fn handler_for(router: &Router<&'static str>, path: &str) -> String {
    let bound = router.match_route(&Method::GET, path).unwrap();
    let request = Request::builder().uri(path).body(Bytes::new()).unwrap();
    let req = ApiRequest::from_request(request, Links::default());
    let response = bound.call(req, *router.config()).await.unwrap();
    json_body(response).await["handler"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_same_name_siblings_first_declared_wins() {
    let tree = Resource::root()
        .resource(Resource::entity("orders", r"\d+").read(named("numeric")))
        .resource(Resource::entity("orders", r"\w+").read(named("word")));
    let router = Router::new(tree, "cfg").unwrap();
    assert_eq!(router.len(), 2);

    for _ in 0..3 {
        assert_eq!(handler_for(&router, "/orders/42").await, "numeric");
    }
    assert_eq!(handler_for(&router, "/orders/abc").await, "word");

    let templates: Vec<(&str, String)> = router.templates().map(|(k, t)| (k, t.to_string())).collect();
    assert_eq!(templates, vec![("orders.read", "/orders/{id}".to_string())]);
}

#[test]
fn test_sanitized_names_agree_in_both_tables() {
    let tree = Resource::root()
        .resource(
            Resource::entity("line-items", r"\d+")
                .read(named("line-items.read"))
                .resource(Resource::singleton("notes").read(named("line-items.notes.read"))),
        )
        .resource(
            Resource::entity("2fa", r"[a-z]+")
                .resource(Resource::singleton("codes").read(named("2fa.codes.read")).update(named("2fa.codes.update"))),
        );

    let routes = walk(&tree).unwrap();
    let matchers = compile_matchers(&routes).unwrap();
    let templates: HashMap<String, _> = compile_paths(&routes).into_iter().collect();
    for matcher in &matchers {
        let captures: Vec<&str> = matcher.pattern.capture_names().flatten().collect();
        let placeholders: Vec<&str> = templates[&*matcher.key].placeholders().collect();
        assert_eq!(captures, placeholders, "{}", matcher.key);
    }

    let router = Router::new(tree, "cfg").unwrap();
    let cases = [
        ("line-items.notes.read", "line_items_id", "7", "/line-items/7/notes"),
        ("2fa.codes.read", "_2fa_id", "totp", "/2fa/totp/codes"),
        ("2fa.codes.update", "_2fa_id", "totp", "/2fa/totp/codes"),
    ];
    for (key, placeholder, value, expected) in cases {
        let path = router.path_for(key, &[(placeholder, value)], &[]).unwrap();
        assert_eq!(path, expected);

        let method = Operation::from_key(key).unwrap().method();
        let bound = router.match_route(&method, &path).unwrap();
        assert_eq!(&*bound.key, key);
        assert_eq!(bound.params, params(&[(placeholder, value)]));
    }
}

#[test]
fn test_trailing_slash_is_equivalent() {
    let router = Router::new(orders_tree(), "cfg").unwrap();
    let cases = [
        (Method::GET, "/orders"),
        (Method::POST, "/orders"),
        (Method::GET, "/orders/42"),
        (Method::DELETE, "/orders/42"),
        (Method::GET, "/orders/42/summary"),
        (Method::GET, "/orders/42/items/sku-7"),
        (Method::POST, "/status"),
    ];

    for (method, path) in cases {
        let plain = router.match_route(&method, path).unwrap();
        let slashed = router.match_route(&method, &format!("{path}/")).unwrap();
        assert_eq!(plain.key, slashed.key, "{method} {path}");
        assert_eq!(plain.params, slashed.params, "{method} {path}");
    }
    assert!(router.match_route(&Method::GET, "/orders//").is_err());
}

#[test]
fn test_unknown_key_fails() {
    let router = Router::new(orders_tree(), "cfg").unwrap();
    for key in ["nonexistent.key", "orders", "orders.summary.list", ""] {
        let err = router.path_for(key, &[("id", "1")], &[]).unwrap_err();
        assert!(matches!(&err, RoutingError::UnknownResource { key: k } if k == key), "{err}");
    }
}

#[test]
fn test_missing_placeholder_fails() {
    let router = Router::new(orders_tree(), "cfg").unwrap();

    let err = router.path_for("orders.items.read", &[("id", "5")], &[]).unwrap_err();
    match err {
        RoutingError::IncompleteResource { key, missing } => {
            assert_eq!(key, "orders.items.read");
            assert_eq!(missing, vec!["orders_id".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = router.path_for("orders.items.read", &[], &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Incomplete API resource: orders.items.read. Missing parameter(s): orders_id, id"
    );
}

#[test]
fn test_orders_summary_scenario() {
    let tree = Resource::root().resource(
        Resource::entity("orders", r"\d+")
            .list(named("list"))
            .create(named("create"))
            .read(named("read"))
            .resource(Resource::singleton("summary").read(named("summary"))),
    );
    let router = Router::new(tree, "cfg").unwrap();

    let bound = router.match_route(&Method::GET, "/orders").unwrap();
    assert_eq!(&*bound.key, "orders.list");
    assert!(bound.params.is_empty());

    let bound = router.match_route(&Method::POST, "/orders").unwrap();
    assert_eq!(&*bound.key, "orders.create");

    let bound = router.match_route(&Method::GET, "/orders/42").unwrap();
    assert_eq!(&*bound.key, "orders.read");
    assert_eq!(bound.params, params(&[("id", "42")]));

    let bound = router.match_route(&Method::GET, "/orders/42/summary").unwrap();
    assert_eq!(&*bound.key, "orders.summary.read");
    assert_eq!(bound.params, params(&[("orders_id", "42")]));

    assert_eq!(
        router.path_for("orders.summary.read", &[("orders_id", "42")], &[]).unwrap(),
        "/orders/42/summary"
    );

    let err = router.match_route(&Method::GET, "/orders/abc").unwrap_err();
    assert!(err.is_not_found());
    assert!(router.match_route(&Method::DELETE, "/orders/42").unwrap_err().is_not_found());
}

#[test]
fn test_url_for_with_query() {
    let router = Router::new(orders_tree(), "cfg").unwrap();
    let url = router
        .url_for(
            "https://shop.test/",
            "orders.items.list",
            &[("orders_id", "42")],
            &[("sku", "a b"), ("page", "2")],
        )
        .unwrap();
    assert_eq!(url, "https://shop.test/orders/42/items?sku=a+b&page=2");
}
