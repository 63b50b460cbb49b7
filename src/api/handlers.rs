//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::schedule::evaluate::find_schedule;
use crate::schedule::{ScheduleKind, annual_values};

use super::AppState;
use super::types::{ErrorResponse, ScheduleSummary, ValuesQuery, ValuesResponse};

/// Lists every schedule object in the document.
///
/// `GET /schedules` → 200 + `Vec<ScheduleSummary>` JSON
pub async fn get_schedules(State(state): State<Arc<AppState>>) -> Json<Vec<ScheduleSummary>> {
    let schedules = state
        .document
        .iter()
        .filter(|o| ScheduleKind::from_object_type(&o.obj_type).is_some())
        .map(|o| ScheduleSummary {
            object_type: o.obj_type.clone(),
            name: o.name.clone(),
        })
        .collect();
    Json(schedules)
}

/// Evaluates a named schedule over a full year.
///
/// `GET /values?name=N` → 200 + `ValuesResponse` JSON
/// `GET /values?name=N&year=Y` → evaluated against year `Y`
/// Unknown name → 404; evaluation failure → 422.
pub async fn get_values(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ValuesQuery>,
) -> impl IntoResponse {
    let Some(obj) = find_schedule(&state.document, &query.name) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no schedule named {:?}", query.name),
            }),
        ));
    };

    let year = query.year.unwrap_or(state.year);
    match annual_values(obj, &state.document, year, &state.options) {
        Ok(values) => Ok(Json(ValuesResponse {
            name: obj.name.clone(),
            year,
            values,
        })),
        Err(e) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::document::Document;
    use crate::object::IdfObject;
    use crate::schedule::EvalOptions;

    fn make_test_state() -> Arc<AppState> {
        let mut doc = Document::new();
        let mut constant = IdfObject::new("Schedule:Constant", "AlwaysHalf");
        constant.set("Hourly Value", "0.5");
        doc.add(constant);
        doc.add(IdfObject::new("Zone", "Core"));
        let mut week = IdfObject::new("Schedule:Week:Daily", "Dangling Week");
        week.set("Monday Schedule:Day Name", "Ghost Day");
        let mut year = IdfObject::new("Schedule:Year", "Broken Year");
        year.set("Schedule:Week Name 1", "Dangling Week");
        year.set("Start Month 1", "1");
        year.set("Start Day 1", "1");
        year.set("End Month 1", "12");
        year.set("End Day 1", "31");
        doc.add(week);
        doc.add(year);

        Arc::new(AppState {
            document: doc,
            year: 2023,
            options: EvalOptions::default(),
        })
    }

    #[tokio::test]
    async fn schedules_lists_only_schedule_objects() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/schedules")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 3);
        assert!(json.iter().all(|s| s["object_type"] != "Zone"));
    }

    #[tokio::test]
    async fn values_returns_full_year() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/values?name=alwayshalf")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["year"], 2023);
        assert_eq!(json["values"].as_array().map(Vec::len), Some(8760));
        assert_eq!(json["values"][0], 0.5);
    }

    #[tokio::test]
    async fn values_honors_year_override() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/values?name=AlwaysHalf&year=2024")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["values"].as_array().map(Vec::len), Some(8784));
    }

    #[tokio::test]
    async fn unknown_schedule_returns_404() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/values?name=Nothing")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn evaluation_failure_returns_422() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/values?name=Broken%20Year")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
    }
}
