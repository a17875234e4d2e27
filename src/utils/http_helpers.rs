use axum::response::IntoResponse;
use axum::response::Response;
use http::StatusCode;

// -- Error Handling

pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let body = format!("{{\"error\": \"{}\"}}", self.message);
        Response::builder()
            .status(self.status)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }
}
