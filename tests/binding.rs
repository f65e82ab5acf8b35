use meridian::extract::{self, DecodeStrategy, Present};
use meridian::http::{Method, Request};
use meridian::route::{MatchedRoute, Matcher};
use meridian::{Bind, BindingError};

use serde::Deserialize;

meridian::parameter_key!(Id => "id": u64);

#[derive(Debug, Deserialize, PartialEq)]
struct Todo {
    title: String,
    order: Option<i32>,
}

fn json_request(method: Method, uri: &str, body: &'static str) -> Request {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(("Content-Type", "application/json"))
        .body(body)
        .build()
}

#[test]
fn query_decoding() {
    let req = Request::builder().uri("/?n=5&b=true&s=hello").build();
    let route = MatchedRoute::new();

    let (n, b, s) = (
        extract::query::<i32>("n"),
        extract::query::<bool>("b"),
        extract::query::<String>("s"),
    )
        .bind(&req, &route)
        .unwrap();

    assert_eq!((n, b, s.as_str()), (5, true, "hello"));
}

#[test]
fn decode_strategies_in_order() {
    assert_eq!(
        DecodeStrategy::ORDER,
        [DecodeStrategy::Literal, DecodeStrategy::QuotedString]
    );

    assert!(DecodeStrategy::Literal.decode::<String>("hello").is_err());
    assert_eq!(
        DecodeStrategy::QuotedString.decode::<String>("hello").unwrap(),
        "hello"
    );
    assert!(DecodeStrategy::QuotedString.decode::<u8>("5").is_err());
    assert_eq!(DecodeStrategy::Literal.decode::<u8>("5").unwrap(), 5);
}

#[test]
fn optional_and_required_query() {
    let req = Request::builder().uri("/").build();
    let route = MatchedRoute::new();

    let (page,) = (extract::query::<u32>("page").optional(),)
        .bind(&req, &route)
        .unwrap();
    assert_eq!(page, None);

    let errors = (extract::query::<u32>("page"),)
        .bind(&req, &route)
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors.iter().next(),
        Some(BindingError::MissingQueryParameter { key }) if key == "page"
    ));
}

#[test]
fn presence_only_parameters() {
    let req = Request::builder()
        .query_item("done", None)
        .query_item("verbose", Some("no"))
        .build();

    let (done, verbose, quiet) = (
        extract::flag("done"),
        extract::flag("verbose"),
        extract::flag("quiet").optional(),
    )
        .bind(&req, &MatchedRoute::new())
        .unwrap();

    assert_eq!(done, Present);
    assert_eq!(verbose, Present);
    assert_eq!(quiet, None);
}

#[test]
fn body_on_get_is_unexpected() {
    for body in ["", "{}", r#"{"title":"x"}"#, "<xml/>"] {
        let req = json_request(Method::Get, "/", body);
        let errors = (extract::json::<Todo>(),)
            .bind(&req, &MatchedRoute::new())
            .unwrap_err();

        let kinds: Vec<_> = errors.iter().map(BindingError::kind).collect();
        assert_eq!(kinds, ["unexpected_body"]);
    }
}

#[test]
fn every_invalid_input_is_reported() {
    let req = json_request(Method::Post, "/todos/abc?order=first", "");
    let route = Matcher::pattern("/todos/{id}").matches(&req).unwrap();

    let inputs = (
        extract::url_param::<Id>(),
        extract::query::<i32>("order"),
        extract::json::<Todo>(),
    );

    let errors = inputs.bind(&req, &route).unwrap_err();
    let kinds: Vec<_> = errors.iter().map(BindingError::kind).collect();
    assert_eq!(
        kinds,
        ["url_parameter_decoding", "query_parameter_decoding", "missing_body"]
    );

    let message = errors.to_string();
    assert!(message.contains("`id`"), "{}", message);
    assert!(message.contains("`order`"), "{}", message);
    assert!(message.contains("missing request body"), "{}", message);
}

#[test]
fn successful_binding() {
    let req = json_request(
        Method::Post,
        "/todos/9?dry_run",
        r#"{"title":"write tests","order":2}"#,
    );
    let route = Matcher::post("/todos/{id}").matches(&req).unwrap();

    let (id, dry_run, todo) = (
        extract::url_param::<Id>(),
        extract::flag("dry_run").optional(),
        extract::json::<Todo>(),
    )
        .bind(&req, &route)
        .unwrap();

    assert_eq!(id, 9);
    assert!(dry_run.is_some());
    assert_eq!(
        todo,
        Todo {
            title: "write tests".into(),
            order: Some(2)
        }
    );
}

#[test]
fn keys_missing_from_the_route() {
    let req = Request::builder().uri("/todos").build();
    let route = Matcher::pattern("/todos").matches(&req).unwrap();

    let errors = (extract::url_param::<Id>(),).bind(&req, &route).unwrap_err();
    assert!(matches!(
        errors.into_vec().as_slice(),
        [BindingError::MissingUrlParameter { name: "id" }]
    ));
}
