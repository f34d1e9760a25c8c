use actix_http::Request;
use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App, HttpResponse};
use serde::Serialize;

pub async fn post_json<T: Serialize>(
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    send(req, configure).await
}

pub async fn post_raw(
    path: &str,
    body: String,
    headers: Vec<(&'static str, String)>,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri(path).set_payload(body);
    for (name, value) in headers {
        req = req.insert_header((name, value));
    }
    send(req.to_request(), configure).await
}

async fn send(req: Request, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let res = match test::try_call_service(&service, req).await {
        Ok(res) => res.into_parts().1,
        // Handler and middleware rejections surface as errors here; render them the way actix
        // would for a real client.
        Err(e) => HttpResponse::from_error(e),
    };
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
