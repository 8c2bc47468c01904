//! Property tests for option merging and body encoding.

use proptest::prelude::*;
use request_client::{
    HttpRequest, HttpResponse, RequestClient, RequestOptions, TransportError, AUTH_HEADER,
};
use serde_json::{Map, Value};

fn header_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,12}"
}

fn header_value() -> impl Strategy<Value = String> {
    "[ -~]{0,24}"
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _.-]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Transport that answers 200 with the request body echoed back.
fn echo(req: HttpRequest) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(200, req.body.unwrap_or_default()))
}

proptest! {
    #[test]
    fn update_keeps_other_headers_and_overwrites_matching(
        existing in prop::collection::btree_map(header_name(), header_value(), 0..8),
        name in header_name(),
        value in header_value(),
        shout in any::<bool>(),
    ) {
        let mut client = RequestClient::with_transport("http://localhost/", RequestOptions::new(), echo);
        for (k, v) in &existing {
            client.update_options(&RequestOptions::new().header(k.as_str(), v.as_str()));
        }

        let spelled = if shout { name.to_ascii_uppercase() } else { name.clone() };
        client.update_options(&RequestOptions::new().header(spelled, value.as_str()));

        let headers = &client.default_options().headers;
        prop_assert_eq!(headers.get(&name), Some(value.as_str()));
        for (k, v) in &existing {
            if !k.eq_ignore_ascii_case(&name) {
                prop_assert_eq!(headers.get(k), Some(v.as_str()));
            }
        }
        let expected_len = existing.len() + usize::from(!existing.contains_key(&name));
        prop_assert_eq!(headers.len(), expected_len);
    }

    #[test]
    fn merge_never_mutates_defaults(
        defaults in prop::collection::btree_map(header_name(), header_value(), 0..6),
        call in prop::collection::btree_map(header_name(), header_value(), 0..6),
    ) {
        let defaults: RequestOptions = defaults
            .into_iter()
            .fold(RequestOptions::new(), |o, (k, v)| o.header(k, v));
        let call: RequestOptions = call
            .into_iter()
            .fold(RequestOptions::new(), |o, (k, v)| o.header(k, v));

        let before = defaults.clone();
        let merged = defaults.merged(&call);
        prop_assert_eq!(&defaults, &before);
        for (k, v) in call.headers.iter() {
            prop_assert_eq!(merged.headers.get(k), Some(v));
        }
    }

    #[test]
    fn auth_token_is_sent_verbatim(token in "[ -~]{0,40}") {
        let mut client = RequestClient::with_transport("http://localhost/", RequestOptions::new(), echo);
        client.auth(token.as_str());
        prop_assert_eq!(client.default_options().headers.get(AUTH_HEADER), Some(token.as_str()));
    }

    #[test]
    fn posted_body_round_trips(body in json_value()) {
        let client = RequestClient::with_transport("http://localhost/", RequestOptions::new(), echo);
        let reply: Value = client.post("./echo", None, Some(&body), None).unwrap();
        prop_assert_eq!(reply, body);
    }
}

