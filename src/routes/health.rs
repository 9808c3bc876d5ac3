use crate::models::health::HealthResponse;
use rocket::get;
use rocket::serde::json::Json;
use rocket_okapi::openapi;

/// Liveness probe. Does not touch the database.
#[openapi(tag = "Health")]
#[get("/")]
pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![healthcheck]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    #[rocket::async_test]
    async fn health_check_works() {
        let rocket = rocket::build().mount("/health", routes().0);
        let client = Client::tracked(rocket).await.expect("valid rocket instance");

        let response = client.get("/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().await.unwrap(), r#"{"status":"ok"}"#);
    }
}
