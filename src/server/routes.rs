use axum::{
    Router,
    routing::{get, post},
};

use super::{SharedState, handlers};

/// Create the application router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/parse", post(handlers::parse))
        .route(
            "/entry",
            post(handlers::create_entry).get(handlers::get_entry),
        )
        .route("/summary", get(handlers::summary))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::server::ServerState;

    fn app() -> Router {
        router(ServerState::default().shared())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn seed_cake(app: &Router) {
        let entries = [
            json!({"type": "ingredient", "name": "Eggs", "cookTime": 1}),
            json!({"type": "recipe", "name": "Batter",
                   "requiredItems": [{"name": "Eggs", "quantity": 3}]}),
            json!({"type": "recipe", "name": "Frosting",
                   "requiredItems": [{"name": "Eggs", "quantity": 1}]}),
            json!({"type": "recipe", "name": "Cake",
                   "requiredItems": [{"name": "Batter", "quantity": 1},
                                     {"name": "Frosting", "quantity": 2}]}),
        ];
        for entry in &entries {
            let response = send(app, post_json("/entry", entry)).await;
            assert_eq!(response.status(), StatusCode::OK, "seeding {entry}");
        }
    }

    #[tokio::test]
    async fn health_check() {
        let response = send(&app(), get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn parse_normalizes_name() {
        let response = send(
            &app(),
            post_json("/parse", &json!({"input": "bEtty_CROCker-pancakes"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, json!({"msg": "Betty CROCker Pancakes"}));
    }

    #[tokio::test]
    async fn parse_rejects_names_without_letters() {
        let response = send(&app(), post_json("/parse", &json!({"input": "___"}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid recipe name");
    }

    #[tokio::test]
    async fn parse_missing_input_is_rejected() {
        let response = send(&app(), post_json("/parse", &json!({}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_entry_returns_empty_body() {
        let response = send(
            &app(),
            post_json(
                "/entry",
                &json!({"type": "ingredient", "name": "Eggs", "cookTime": 6}),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn duplicate_entry_is_rejected_with_message() {
        let app = app();
        let eggs = json!({"type": "ingredient", "name": "Eggs", "cookTime": 6});
        send(&app, post_json("/entry", &eggs)).await;

        let response = send(&app, post_json("/entry", &eggs)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Cookbook already has an entry with name Eggs"
        );
    }

    #[tokio::test]
    async fn unsupported_type_is_rejected() {
        let response = send(
            &app(),
            post_json("/entry", &json!({"type": "Recipe", "name": "Cake"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_never_reaches_the_cookbook() {
        let request = Request::builder()
            .method("POST")
            .uri("/entry")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = send(&app(), request).await;

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn get_entry_returns_creation_shape() {
        let app = app();
        seed_cake(&app).await;

        let response = send(&app, get("/entry?name=Batter")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body,
            json!({"name": "Batter", "type": "recipe",
                   "requiredItems": [{"name": "Eggs", "quantity": 3}]})
        );
    }

    #[tokio::test]
    async fn get_missing_entry_is_not_found() {
        let response = send(&app(), get("/entry?name=Nothing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn summary_resolves_nested_recipe() {
        let app = app();
        seed_cake(&app).await;

        let response = send(&app, get("/summary?name=Cake")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Cake",
                "cookTime": 5,
                "ingredients": [{"name": "Eggs", "quantity": 5}]
            })
        );
    }

    #[tokio::test]
    async fn summary_of_ingredient_is_rejected() {
        let app = app();
        seed_cake(&app).await;

        let response = send(&app, get("/summary?name=Eggs")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Eggs is an ingredient, not a recipe"
        );
    }

    #[tokio::test]
    async fn summary_without_name_is_rejected() {
        let response = send(&app(), get("/summary")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn summary_reports_broken_reference() {
        let app = app();
        send(
            &app,
            post_json(
                "/entry",
                &json!({"type": "recipe", "name": "Toast",
                        "requiredItems": [{"name": "Bread", "quantity": 2}]}),
            ),
        )
        .await;

        let response = send(&app, get("/summary?name=Toast")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Recipe 'Toast' requires 'Bread', which is not in the cookbook"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicates_yield_one_success() {
        let app = app();
        let eggs = json!({"type": "ingredient", "name": "Eggs", "cookTime": 1});

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let app = app.clone();
                let request = post_json("/entry", &eggs);
                tokio::spawn(async move { app.oneshot(request).await.unwrap().status() })
            })
            .collect();

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap() == StatusCode::OK {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
    }
}
