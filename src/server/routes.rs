use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State as AxumState},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::task::spawn_blocking;

use super::{error::AppError, state::State};
use crate::{db, db::StoredDay, importer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    markdown: Option<String>,
    day_number: Option<i64>,
}

impl ImportRequest {
    fn validate(self) -> Result<(String, u32), AppError> {
        const REQUIRED: &str = "markdown and dayNumber are required";
        let markdown = self
            .markdown
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| AppError::MalformedPayload(REQUIRED.into()))?;
        let day = self
            .day_number
            .filter(|d| *d > 0)
            .and_then(|d| u32::try_from(d).ok())
            .ok_or_else(|| AppError::MalformedPayload(REQUIRED.into()))?;
        Ok((markdown, day))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    success: bool,
    day_number: u32,
    roots_count: usize,
    words_count: usize,
}

pub async fn import_handler(
    AxumState(state): AxumState<Arc<State>>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let (markdown, day) = request.validate()?;

    let summary = spawn_blocking(move || -> Result<_, AppError> {
        let conn = state.conn()?;
        let summary = importer::import_day(&conn, &state.curriculum, &markdown, day)?;
        Ok(summary)
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))??;

    Ok(Json(ImportResponse {
        success: true,
        day_number: summary.day_number,
        roots_count: summary.roots_count,
        words_count: summary.words_count,
    }))
}

pub async fn day_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(day): Path<u32>,
) -> Result<Json<StoredDay>, AppError> {
    let stored = spawn_blocking(move || -> Result<_, AppError> {
        let conn = state.conn()?;
        let stored = db::fetch_day(&conn, day).map_err(|e| AppError::InternalError(e.to_string()))?;
        Ok(stored)
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))??;

    stored.map(Json).ok_or(AppError::DayNotImported(day))
}

pub async fn health_handler() -> &'static str {
    "ok"
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;
    use crate::curriculum::Curriculum;
    use crate::server::router;

    const SCENARIO: &str = "### Day 01\n예술과 문화\n### 그림 도圖\nmeaning-en\nmeaning-ja\nmeaning-zh\nmeaning-vi\n\
        도서관 library / 図書館 / 图书馆 / thư viện\n\
        지도 map / 地図 / 地图 / bản đồ\n### Day 02\n...";

    async fn spawn_app() -> (String, Arc<State>) {
        let conn = db::connect(":memory:").unwrap();
        db::init_schema(&conn).unwrap();
        let state = State::new(Curriculum::load().unwrap(), conn);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        tokio::spawn(async move { axum::serve(listener, app).await });

        (format!("http://{}", addr), state)
    }

    async fn post(base: &str, body: Value) -> (u16, Value) {
        let res = reqwest::Client::new()
            .post(format!("{}/hanja-import", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status().as_u16();
        (status, res.json().await.unwrap())
    }

    #[tokio::test]
    async fn imports_scenario() {
        let (base, _) = spawn_app().await;
        let (status, body) = post(&base, json!({ "markdown": SCENARIO, "dayNumber": 1 })).await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({ "success": true, "dayNumber": 1, "rootsCount": 1, "wordsCount": 2 })
        );

        let day: Value = reqwest::get(format!("{}/days/1", base)).await.unwrap().json().await.unwrap();
        assert_eq!(day["topic"], "예술과 문화");
        assert_eq!(day["roots"][0]["hanjaCharacter"], "圖");
        assert_eq!(day["roots"][0]["nativeMeaning"], "그림");
        assert_eq!(day["roots"][0]["words"][0]["word"], "도서관");
        assert_eq!(day["roots"][0]["words"][1]["word"], "지도");
    }

    #[tokio::test]
    async fn root_path_also_imports() {
        let (base, _) = spawn_app().await;
        let res = reqwest::Client::new()
            .post(format!("{}/", base))
            .json(&json!({ "markdown": SCENARIO, "dayNumber": 1 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn missing_fields_are_bad_requests() {
        let (base, _) = spawn_app().await;
        for body in [
            json!({ "dayNumber": 1 }),
            json!({ "markdown": SCENARIO }),
            json!({ "markdown": "", "dayNumber": 1 }),
            json!({ "markdown": SCENARIO, "dayNumber": 0 }),
            json!({ "markdown": SCENARIO, "dayNumber": 500 }),
        ] {
            let (status, res) = post(&base, body.clone()).await;
            assert_eq!(status, 400, "body {}", body);
            assert!(res["error"].is_string());
        }
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let (base, _) = spawn_app().await;
        let res = reqwest::Client::new()
            .post(format!("{}/hanja-import", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_section_is_not_found() {
        let (base, _) = spawn_app().await;
        let (status, body) = post(&base, json!({ "markdown": SCENARIO, "dayNumber": 9 })).await;
        assert_eq!(status, 404);
        assert!(body["error"].is_string());
        assert_eq!(body["debug"]["linesScanned"], 11);
    }

    #[tokio::test]
    async fn storage_failure_is_server_error() {
        let (base, state) = spawn_app().await;
        state
            .conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_roots BEFORE INSERT ON hanja_roots
                 BEGIN SELECT RAISE(ABORT, 'roots table is read-only'); END;",
            )
            .unwrap();
        let (status, body) = post(&base, json!({ "markdown": SCENARIO, "dayNumber": 1 })).await;
        assert_eq!(status, 500);
        assert!(body["error"].as_str().unwrap().contains("read-only"));
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let (base, _) = spawn_app().await;
        let res = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("{}/hanja-import", base))
            .header("origin", "https://lukato.example")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
        assert!(res.text().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn day_not_imported() {
        let (base, _) = spawn_app().await;
        let res = reqwest::get(format!("{}/days/3", base)).await.unwrap();
        assert_eq!(res.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn health() {
        let (base, _) = spawn_app().await;
        let res = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(res.text().await.unwrap(), "ok");
    }
}
