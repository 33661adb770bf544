use super::*;
use futures::executor::block_on;
use session::transport::{Method, RequestBody};

#[test]
fn network_error_keeps_detail() {
    assert_eq!(network_error("offline"), SessionError::Network("offline".to_owned()));
}

#[test]
fn requests_are_unavailable_outside_browser() {
    let request = ApiRequest {
        method: Method::Get,
        url: "http://api.test/auth/me".to_owned(),
        authorization: None,
        body: RequestBody::Empty,
    };
    assert_eq!(block_on(GlooHttp.send(request)), Err(SessionError::Unavailable));
}

#[test]
fn client_api_uses_compiled_base_url() {
    assert_eq!(client_api().config(), &ApiConfig::compiled());
}
