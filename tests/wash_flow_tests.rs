//! Flujos completos contra PostgreSQL. Se saltan si no hay `DATABASE_URL`.

mod common;

use axum::http::{header, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use base64::Engine;
use chrono::Utc;

use carwash_pos::models::wash_record::WashStatus;
use carwash_pos::repositories::WashRecordRepository;
use carwash_pos::state::AppState;
use common::{app_with_session, body_json, database_pool, json_request, test_config};

fn unique_plate(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("{}{}", prefix, suffix)
}

async fn call(app: &axum::Router, method: &str, uri: &str, cookie: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(method, uri, Some(cookie), body))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_wash_lifecycle_end_to_end() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/workers",
        &cookie,
        Some(json!({"name": format!("Worker {}", Uuid::new_v4())})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let worker_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["role"], "CARWASH");

    let plate = unique_plate("xy ");
    let (status, body) = call(
        &app,
        "POST",
        "/api/wash-records",
        &cookie,
        Some(json!({
            "plateNumber": plate.to_lowercase(),
            "washType": "OUTER",
            "amountPaid": 90,
            "paymentType": "CASH",
            "workerId": worker_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let record = &body["data"];
    let id = record["id"].as_str().unwrap().to_string();
    assert_eq!(record["plateNumber"], plate.to_uppercase());
    assert_eq!(record["status"], "IN_PROGRESS");
    assert_eq!(record["paymentReceived"], false);
    assert!(record["finishTime"].is_null());
    assert_eq!(record["worker"]["id"], worker_id.as_str());

    let (status, body) = call(&app, "POST", &format!("/api/wash-records/{}/finish", id), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "FINISHED");
    assert!(body["data"]["finishTime"].is_string());
    assert!(body["data"]["elapsedMinutes"].is_number());
    let finished = body["data"].clone();

    // un segundo finish no toca el registro
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/wash-records/{}/finish", id),
        &cookie,
        Some(json!({"amountPaid": 170, "paymentType": "INSTAPAY"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Record is already finished");

    let (status, body) = call(&app, "GET", &format!("/api/wash-records/{}", id), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["finishTime"], finished["finishTime"]);
    assert_eq!(body["data"]["elapsedMinutes"], finished["elapsedMinutes"]);
    assert_eq!(body["data"]["amountPaid"], 90.0);
    assert_eq!(body["data"]["paymentType"], "CASH");

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/api/wash-records/{}/payment", id),
        &cookie,
        Some(json!({"paymentReceived": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paymentReceived"], true);

    let (status, body) = call(&app, "GET", "/api/wash-records", &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"] == id.as_str()));

    // el trabajador tiene registros: sólo se desactiva
    let (status, body) = call(&app, "DELETE", &format!("/api/workers/{}", worker_id), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], "deactivated");

    let (status, _) = call(&app, "DELETE", &format!("/api/wash-records/{}", id), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", &format!("/api/wash-records/{}", id), &cookie, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_with_partial_payment() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;

    let (_, body) = call(
        &app,
        "POST",
        "/api/wash-records",
        &cookie,
        Some(json!({"plateNumber": unique_plate("CN"), "washType": "FULL"})),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/wash-records/{}/cancel", id),
        &cookie,
        Some(json!({"amountPaid": 50, "paymentType": "INSTAPAY", "notes": "left early"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CANCELLED");
    assert_eq!(body["data"]["amountPaid"], 50.0);
    assert_eq!(body["data"]["paymentReceived"], true);
    assert!(body["data"]["elapsedMinutes"].is_null());

    let (status, _) = call(&app, "POST", &format!("/api/wash-records/{}/finish", id), &cookie, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_worker_is_not_found() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/wash-records",
        &cookie,
        Some(json!({
            "plateNumber": unique_plate("NW"),
            "washType": "INNER",
            "workerId": Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_worker_name_conflicts_and_unused_worker_is_deleted() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;

    let name = format!("Dup {}", Uuid::new_v4());
    let (status, body) = call(&app, "POST", "/api/workers", &cookie, Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "POST",
        "/api/workers",
        &cookie,
        Some(json!({"name": format!("  {}  ", name)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Worker with this name already exists");

    let (status, body) = call(&app, "DELETE", &format!("/api/workers/{}", id), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], "deleted");
}

#[tokio::test]
async fn test_mechanic_service_total_is_computed() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/mechanic",
        &cookie,
        Some(json!({
            "plateNumber": unique_plate("me"),
            "category": "OIL_SERVICE",
            "oilType": "SHELL_5L",
            "serviceType": "OIL_AND_FILTER",
            "filterPrice": 400,
            "totalAmount": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["totalAmount"], 3400.0);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/api/mechanic/{}/payment", id),
        &cookie,
        Some(json!({"paymentReceived": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paymentReceived"], true);
    assert_eq!(body["data"]["totalAmount"], 3400.0);

    let (status, _) = call(&app, "DELETE", &format!("/api/mechanic/{}", id), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_customer_search_finds_arabic_plate() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;

    let letters: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(6)
        .collect::<String>()
        .to_uppercase();
    let stored = format!("Q{}٧٨٩", letters);
    for _ in 0..2 {
        call(
            &app,
            "POST",
            "/api/wash-records",
            &cookie,
            Some(json!({"plateNumber": stored, "washType": "FULL", "amountPaid": 170, "paymentType": "CASH"})),
        )
        .await;
    }

    let uri = format!("/api/customers/search?plate=q{}789", letters.to_lowercase());
    let (status, body) = call(&app, "GET", &uri, &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plateNumber"], stored.as_str());
    assert_eq!(body["data"]["totalVisits"], 2);
    assert_eq!(body["data"]["favoriteWashType"], "FULL");
    assert_eq!(body["data"]["isVIP"], false);
}

#[tokio::test]
async fn test_daily_export_is_a_workbook() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;

    let response = app
        .oneshot(json_request("GET", "/api/export/daily?date=2024-01-15", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"carwash_2024-01-15.xlsx\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // los .xlsx son zip
    assert_eq!(&bytes[..2], b"PK");
}

async fn create_wash(app: &axum::Router, cookie: &str, body: Value) -> String {
    let (status, body) = call(app, "POST", "/api/wash-records", cookie, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_concurrent_finish_has_one_winner() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;
    let id = create_wash(&app, &cookie, json!({"plateNumber": unique_plate("RC"), "washType": "FREE"})).await;

    let uri = format!("/api/wash-records/{}/finish", id);
    let (a, b) = tokio::join!(
        call(&app, "POST", &uri, &cookie, None),
        call(&app, "POST", &uri, &cookie, None),
    );

    let mut statuses = [a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
    let (winner, loser) = if a.0 == StatusCode::OK { (a.1, b.1) } else { (b.1, a.1) };
    assert_eq!(loser["error"], "Record is already finished");

    let (_, stored) = call(&app, "GET", &format!("/api/wash-records/{}", id), &cookie, None).await;
    assert_eq!(stored["data"]["finishTime"], winner["data"]["finishTime"]);
    assert_eq!(stored["data"]["elapsedMinutes"], winner["data"]["elapsedMinutes"]);
}

#[tokio::test]
async fn test_stale_transition_is_not_saved() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool.clone(), test_config())).await;
    let id = create_wash(&app, &cookie, json!({"plateNumber": unique_plate("ST"), "washType": "INNER"})).await;
    let id = Uuid::parse_str(&id).unwrap();

    let repository = WashRecordRepository::new(pool);
    let loaded = repository.find_by_id(id).await.unwrap().unwrap();

    let (status, _) = call(&app, "POST", &format!("/api/wash-records/{}/cancel", id), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);

    // la copia leída antes de cancelar ya no está en curso en la base
    let mut stale = loaded.clone();
    stale.status = WashStatus::Finished;
    stale.finish_time = Some(Utc::now());
    stale.elapsed_minutes = Some(0);
    assert!(repository.save_transition(&stale).await.unwrap().is_none());

    let stored = repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status, WashStatus::Cancelled);
    assert_eq!(stored.elapsed_minutes, None);
}

#[tokio::test]
async fn test_large_proof_is_stored() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool, test_config())).await;
    let id = create_wash(
        &app,
        &cookie,
        json!({
            "plateNumber": unique_plate("PF"),
            "washType": "FULL",
            "amountPaid": 170,
            "paymentType": "INSTAPAY"
        }),
    )
    .await;

    let image = base64::engine::general_purpose::STANDARD.encode(vec![3u8; 3 * 1024 * 1024]);
    let proof = format!("data:image/png;base64,{}", image);
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/wash-records/{}/proof", id),
        &cookie,
        Some(json!({"instapayProof": proof})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["instapayProof"].as_str().map(str::len), Some(proof.len()));
}

#[tokio::test]
async fn test_worker_delete_waits_for_pending_assignment() {
    let Some(pool) = database_pool().await else { return };
    let (app, cookie) = app_with_session(AppState::new(pool.clone(), test_config())).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/workers",
        &cookie,
        Some(json!({"name": format!("Pending {}", Uuid::new_v4())})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let worker_id = Uuid::parse_str(body["data"]["id"].as_str().unwrap()).unwrap();

    // un lavado asignado en una transacción todavía abierta
    let mut tx = pool.begin().await.unwrap();
    sqlx::query(
        "INSERT INTO wash_records (id, plate_number, wash_type, worker_id, entry_time) \
         VALUES ($1, $2, 'FREE', $3, NOW())",
    )
    .bind(Uuid::new_v4())
    .bind(unique_plate("PD"))
    .bind(worker_id)
    .execute(&mut *tx)
    .await
    .unwrap();

    let delete_app = app.clone();
    let delete_cookie = cookie.clone();
    let delete = tokio::spawn(async move {
        call(&delete_app, "DELETE", &format!("/api/workers/{}", worker_id), &delete_cookie, None).await
    });
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tx.commit().await.unwrap();

    let (status, body) = delete.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], "deactivated");
}
