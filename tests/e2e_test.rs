use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{LoanDates, TestContext, date};
use rusty_library_lending::api::types::*;
use rusty_library_lending::ports::NotificationJob;
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// リクエストを1件送り、ステータスとJSON本文を返す
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap()
}

// ============================================================================
// E2Eテスト: 貸出ワークフロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_loan_flow() {
    let ctx = TestContext::new();
    let book = ctx.seed_book("Dune", "9780441172719", 1).await;
    let member = ctx.seed_member("alice").await;
    let app = ctx.router();

    // Step 1: 貸出
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/loan", book.book_id),
        Some(json!({ "member_id": member.member_id.value() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let status_response: StatusResponse = serde_json::from_value(body).unwrap();
    assert_eq!(status_response.status, "Book loaned successfully.");
    assert_eq!(ctx.copies_of(&book), 0);

    let loan_id = match ctx.queue.jobs().as_slice() {
        [NotificationJob::LoanConfirmation { loan_id }] => *loan_id,
        other => panic!("unexpected jobs: {other:?}"),
    };

    // Step 2: 在庫切れで2件目の貸出は失敗
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/loan", book.book_id),
        Some(json!({ "member_id": member.member_id.value() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "No available copies.");

    // Step 3: 延長
    let (status, body) = send(
        &app,
        "POST",
        &format!("/loans/{loan_id}/extend_due_date"),
        Some(json!({ "additional_days": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let extended: LoanResponse = serde_json::from_value(body).unwrap();
    assert_eq!(extended.id, loan_id.value());
    assert_eq!(extended.due_date - extended.loan_date, chrono::Duration::days(19));

    // Step 4: 返却
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/return_book", book.book_id),
        Some(json!({ "member_id": member.member_id.value() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Book returned successfully.");
    assert_eq!(ctx.copies_of(&book), 1);

    // Step 5: 2回目の返却は失敗
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/return_book", book.book_id),
        Some(json!({ "member_id": member.member_id.value() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Active loan does not exist.");

    // Step 6: 返却済みの貸出は延長できない
    let (status, body) = send(
        &app,
        "POST",
        &format!("/loans/{loan_id}/extend_due_date"),
        Some(json!({ "additional_days": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Loan is already returned");
}

#[tokio::test]
async fn test_e2e_loan_errors() {
    let ctx = TestContext::new();
    let book = ctx.seed_book("Dune", "9780441172719", 1).await;
    let app = ctx.router();

    // 存在しない書籍は404
    let (status, _) = send(
        &app,
        "POST",
        &format!("/books/{}/loan", uuid::Uuid::new_v4()),
        Some(json!({ "member_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 存在しない会員
    let (status, body) = send(
        &app,
        "POST",
        &format!("/books/{}/loan", book.book_id),
        Some(json!({ "member_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Member does not exist.");

    // 会員ID未指定
    let (status, body) = send(&app, "POST", &format!("/books/{}/loan", book.book_id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Member does not exist.");

    assert_eq!(ctx.copies_of(&book), 1);
}

#[tokio::test]
async fn test_e2e_extend_due_date_errors() {
    let ctx = TestContext::new();
    let book = ctx.seed_book("Dune", "9780441172719", 1).await;
    let member = ctx.seed_member("alice").await;
    let today = chrono::Local::now().date_naive();
    let current = ctx
        .seed_loan(
            &book,
            &member,
            LoanDates::active(today, today + chrono::Duration::days(14)),
        )
        .await;
    let overdue = ctx
        .seed_loan(
            &book,
            &member,
            LoanDates::active(
                today - chrono::Duration::days(30),
                today - chrono::Duration::days(16),
            ),
        )
        .await;
    let app = ctx.router();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/loans/{}/extend_due_date", uuid::Uuid::new_v4()),
        Some(json!({ "additional_days": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Loan not found");

    for payload in [
        json!({}),
        json!({ "additional_days": 0 }),
        json!({ "additional_days": -2 }),
        json!({ "additional_days": "abc" }),
        json!({ "additional_days": 4_000_000_000u64 }),
    ] {
        let (status, body) = send(
            &app,
            "POST",
            &format!("/loans/{}/extend_due_date", current.loan_id),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(
            error_message(&body),
            "Incorrect additional number of days provided"
        );
    }

    let (status, body) = send(
        &app,
        "POST",
        &format!("/loans/{}/extend_due_date", overdue.loan_id),
        Some(json!({ "additional_days": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Loan is overdue");
}

#[tokio::test]
async fn test_e2e_extend_due_date_keeps_loan_when_days_exceed_calendar() {
    let ctx = TestContext::new();
    let book = ctx.seed_book("Dune", "9780441172719", 1).await;
    let member = ctx.seed_member("alice").await;
    let today = chrono::Local::now().date_naive();
    let due_date = today + chrono::Duration::days(14);
    let loan = ctx
        .seed_loan(&book, &member, LoanDates::active(today, due_date))
        .await;
    let app = ctx.router();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/loans/{}/extend_due_date", loan.loan_id),
        Some(json!({ "additional_days": 4_000_000_000u64 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Incorrect additional number of days provided"
    );

    let (status, body) = send(&app, "GET", &format!("/loans/{}", loan.loan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let stored: LoanResponse = serde_json::from_value(body).unwrap();
    assert_eq!(stored.due_date, due_date);
}

#[tokio::test]
async fn test_e2e_loan_record_return_fields_stay_consistent() {
    let ctx = TestContext::new();
    let book = ctx.seed_book("Dune", "9780441172719", 1).await;
    let member = ctx.seed_member("alice").await;
    let today = chrono::Local::now().date_naive().to_string();
    let app = ctx.router();

    // 返却日なしの返却済み、返却日ありの貸出中はどちらも作成できない
    for payload in [
        json!({
            "book_id": book.book_id.value(),
            "member_id": member.member_id.value(),
            "is_returned": true,
        }),
        json!({
            "book_id": book.book_id.value(),
            "member_id": member.member_id.value(),
            "return_date": today,
        }),
    ] {
        let (status, _) = send(&app, "POST", "/loans", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
    }

    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({
            "book_id": book.book_id.value(),
            "member_id": member.member_id.value(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan: LoanResponse = serde_json::from_value(body).unwrap();
    let uri = format!("/loans/{}", loan.id);

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "return_date": today }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "is_returned": true, "return_date": today })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");

    // 返却日だけを消すと返却済みフラグと矛盾する
    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "return_date": null }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "is_returned": false, "return_date": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reopened: LoanResponse = serde_json::from_value(body).unwrap();
    assert_eq!(reopened.return_date, None);
    assert!(!reopened.is_returned);
    assert_eq!(reopened.status, rusty_library_lending::domain::loan::LoanStatus::Active);
}

// ============================================================================
// E2Eテスト: 会員ランキング
// ============================================================================

#[tokio::test]
async fn test_e2e_top_active_members() {
    let ctx = TestContext::new();
    let book = ctx.seed_book("Dune", "9780441172719", 100).await;
    let loan_dates = || LoanDates::active(date(2024, 3, 1), date(2024, 3, 15));

    // 貸出中の冊数: frank=4, carol=3, bob=2, alice=2, erin=1, dave=1, gina=0（返却済みのみ）
    let counts = [
        ("frank", 4),
        ("carol", 3),
        ("bob", 2),
        ("alice", 2),
        ("erin", 1),
        ("dave", 1),
    ];
    for (username, active) in counts {
        let member = ctx.seed_member(username).await;
        for _ in 0..active {
            ctx.seed_loan(&book, &member, loan_dates()).await;
        }
    }
    let gina = ctx.seed_member("gina").await;
    for _ in 0..5 {
        ctx.seed_loan(
            &book,
            &gina,
            LoanDates::returned(date(2024, 3, 1), date(2024, 3, 15), date(2024, 3, 5)),
        )
        .await;
    }

    let (status, body) = send(&ctx.router(), "GET", "/members/top-active", None).await;
    assert_eq!(status, StatusCode::OK);

    let ranking: Vec<TopActiveMemberResponse> = serde_json::from_value(body).unwrap();
    let summary: Vec<(&str, u64)> = ranking
        .iter()
        .map(|m| (m.username.as_str(), m.active_loans))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("frank", 4),
            ("carol", 3),
            ("alice", 2),
            ("bob", 2),
            ("dave", 1)
        ]
    );
    assert_eq!(ranking[0].email, "frank@example.com");
}

#[tokio::test]
async fn test_e2e_top_active_members_empty() {
    let ctx = TestContext::new();
    ctx.seed_member("alice").await;

    let (status, body) = send(&ctx.router(), "GET", "/members/top-active", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// ============================================================================
// E2Eテスト: CRUDとページネーション
// ============================================================================

#[tokio::test]
async fn test_e2e_catalog_crud() {
    let ctx = TestContext::new();
    let app = ctx.router();

    // 著者を作成
    let (status, body) = send(
        &app,
        "POST",
        "/authors",
        Some(json!({ "first_name": "Ursula", "last_name": "Le Guin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let author: AuthorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(author.biography, "");

    // 書籍を作成（在庫数の既定値は1）
    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "The Dispossessed",
            "author_id": author.id,
            "isbn": "9780061054884",
            "genre": "sci-fi",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let book: BookResponse = serde_json::from_value(body).unwrap();
    assert_eq!(book.available_copies, 1);
    assert_eq!(book.author.name, "Ursula Le Guin");

    // ISBNの重複
    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "Another",
            "author_id": author.id,
            "isbn": "9780061054884",
            "genre": "fiction",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "book with this isbn already exists.");

    // 存在しない著者
    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "Orphan",
            "author_id": uuid::Uuid::new_v4(),
            "isbn": "1234567890",
            "genre": "fiction",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Author does not exist.");

    // PATCH は指定したフィールドのみ変更
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/books/{}", book.id),
        Some(json!({ "available_copies": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let patched: BookResponse = serde_json::from_value(body).unwrap();
    assert_eq!(patched.available_copies, 4);
    assert_eq!(patched.title, "The Dispossessed");

    // 会員を作成・重複チェック
    let (status, body) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "username": "shevek", "email": "shevek@anarres.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let member: MemberResponse = serde_json::from_value(body).unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "username": "shevek", "email": "other@anarres.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "A user with that username already exists."
    );

    let (status, _) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "username": "takver", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 汎用の貸出作成は在庫数を変更しない
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "book_id": book.id, "member_id": member.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan: LoanResponse = serde_json::from_value(body).unwrap();
    assert_eq!(loan.due_date - loan.loan_date, chrono::Duration::days(14));

    let (_, body) = send(&app, "GET", &format!("/books/{}", book.id), None).await;
    assert_eq!(body["available_copies"], 4);

    // 返却期限は貸出日+14日より前にできない
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/loans/{}", loan.id),
        Some(json!({
            "book_id": book.id,
            "member_id": member.id,
            "loan_date": "2024-03-01",
            "due_date": "2024-03-10",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 著者を削除すると書籍と貸出も削除される
    let (status, _) = send(&app, "DELETE", &format!("/authors/{}", author.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/books/{}", book.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("/loans/{}", loan.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 会員は残る
    let (status, _) = send(&app, "GET", &format!("/members/{}", member.id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_e2e_pagination() {
    let ctx = TestContext::new();
    for n in 0..12 {
        ctx.seed_member(&format!("member{n:02}")).await;
    }
    let app = ctx.router();

    let (status, body) = send(&app, "GET", "/members", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 12);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["next"], 2);
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(body["results"].as_array().unwrap().len(), 10);
    assert_eq!(body["results"][0]["username"], "member00");

    let (status, body) = send(&app, "GET", "/members?page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], 1);

    let (status, body) = send(&app, "GET", "/members?page=2&page_size=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["username"], "member05");

    let (status, body) = send(&app, "GET", "/members?page=3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Invalid page.");

    let (status, _) = send(&app, "GET", "/members?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/members?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_health_check() {
    let ctx = TestContext::new();

    let response = ctx
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}
