mod common;

use axum::http::{Method, StatusCode};
use common::{issue_codes, spawn_app, uuid_of};
use institute_portal::models::{
    hr::{DEPARTMENT_TABLE, DESIGNATION_TABLE, USERS_TABLE},
    portfolio::FACULTY_TABLE,
    procure::{ITEM_TABLE, ITEM_WORK_ORDER_ENTRY_TABLE},
};
use serde_json::{Value, json};

const CREATED_AT: &str = "2024-03-01 09:30:00";

/// Every generic resource mounted under `/v1`.
const RESOURCE_PATHS: [&str; 18] = [
    "/v1/hr/designation",
    "/v1/hr/department",
    "/v1/hr/users",
    "/v1/portfolio/faculty",
    "/v1/portfolio/department",
    "/v1/portfolio/department-teachers",
    "/v1/portfolio/office",
    "/v1/portfolio/office-entry",
    "/v1/portfolio/offer",
    "/v1/portfolio/online-admission",
    "/v1/portfolio/contact-us",
    "/v1/procure/sub-category",
    "/v1/procure/purchase-cost-center",
    "/v1/procure/vendor",
    "/v1/procure/item",
    "/v1/procure/requisition",
    "/v1/procure/item-work-order",
    "/v1/procure/item-work-order-entry",
];

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_create_then_get_one_round_trip() {
    let app = spawn_app();

    let (status, created) = app
        .json(
            Method::POST,
            "/v1/hr/designation",
            json!({ "name": "Lecturer", "created_at": CREATED_AT, "remarks": "teaching" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let uuid = created["uuid"].as_str().expect("row carries its uuid").to_string();
    assert_eq!(uuid.len(), 21);

    let (status, fetched) = app.get(&format!("/v1/hr/designation/{uuid}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Lecturer");
    assert_eq!(fetched["created_at"], CREATED_AT);
    assert_eq!(fetched["remarks"], "teaching");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_client_supplied_uuid_is_ignored() {
    let app = spawn_app();
    let forged = uuid_of('f');

    let (status, created) = app
        .json(
            Method::POST,
            "/v1/hr/designation",
            json!({ "uuid": forged, "name": "Professor", "created_at": CREATED_AT }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(created["uuid"], forged.as_str());
}

#[tokio::test]
async fn test_toast_style_resource_confirms_by_label() {
    let app = spawn_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/v1/hr/department",
            json!({ "name": "Computer Science", "created_at": CREATED_AT }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "type": "create", "message": "Computer Science created" }));
    assert_eq!(app.repo.rows(&DEPARTMENT_TABLE).len(), 1);
}

#[tokio::test]
async fn test_create_reports_every_violation_without_writing() {
    let app = spawn_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/v1/hr/department",
            json!({ "created_at": "01/03/2024" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["name"], "ValidationError");
    assert_eq!(issue_codes(&body), vec!["invalid_date_time", "required"]);
    assert_eq!(
        body["error"]["issues"][0]["message"],
        "created_at must be in the format \"YYYY-MM-DD HH:MM:SS\""
    );
    assert_eq!(body["error"]["issues"][1]["path"], json!(["name"]));
    assert_eq!(app.repo.write_count(), 0);
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let app = spawn_app();

    let (status, body) = app
        .json(Method::POST, "/v1/hr/department", json!(["not", "an", "object"]))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(issue_codes(&body), vec!["invalid_type"]);
}

#[tokio::test]
async fn test_empty_patch_is_rejected_before_persistence() {
    let app = spawn_app();
    let uuid = uuid_of('d');
    app.repo.seed(
        &DESIGNATION_TABLE,
        json!({ "id": 1, "uuid": uuid, "name": "Lecturer", "created_at": CREATED_AT }),
    );

    for body in [json!({}), json!({ "unknown_column": "x" })] {
        let (status, response) = app
            .json(Method::PATCH, &format!("/v1/hr/designation/{uuid}"), body)
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(issue_codes(&response), vec!["invalid_updates"]);
        assert_eq!(response["error"]["issues"][0]["message"], "No updates provided");
    }
    assert_eq!(app.repo.write_count(), 0);
}

#[tokio::test]
async fn test_patch_skips_required_but_keeps_format_checks() {
    let app = spawn_app();
    let uuid = uuid_of('d');
    app.repo.seed(
        &DESIGNATION_TABLE,
        json!({ "id": 1, "uuid": uuid, "name": "Lecturer", "created_at": CREATED_AT }),
    );

    let (status, body) = app
        .json(
            Method::PATCH,
            &format!("/v1/hr/designation/{uuid}"),
            json!({ "updated_at": "yesterday" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(issue_codes(&body), vec!["invalid_date_time"]);
    assert_eq!(app.repo.write_count(), 0);
}

#[tokio::test]
async fn test_patch_with_null_required_field_is_rejected() {
    let app = spawn_app();
    let uuid = uuid_of('d');
    app.repo.seed(
        &DESIGNATION_TABLE,
        json!({ "id": 1, "uuid": uuid, "name": "Lecturer", "created_at": CREATED_AT }),
    );

    let (status, body) = app
        .json(
            Method::PATCH,
            &format!("/v1/hr/designation/{uuid}"),
            json!({ "name": null }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(issue_codes(&body), vec!["required"]);
    assert_eq!(body["error"]["issues"][0]["path"], json!(["name"]));
    assert_eq!(app.repo.write_count(), 0);
    assert_eq!(app.repo.rows(&DESIGNATION_TABLE)[0]["name"], "Lecturer");

    let (status, listed) = app.get("/v1/hr/designation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["name"], "Lecturer");
}

#[tokio::test]
async fn test_type_errors_do_not_hide_other_violations() {
    let app = spawn_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/v1/portfolio/department",
            json!({ "name": "", "index": "abc", "created_by": "short" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let issues: Vec<(String, String)> = body["error"]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| {
            (
                issue["path"][0].as_str().unwrap().to_string(),
                issue["code"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let expected = [
        ("created_at", "required"),
        ("created_by", "length"),
        ("index", "invalid_type"),
        ("name", "length"),
        ("short_name", "required"),
    ];
    assert_eq!(
        issues,
        expected.map(|(path, code)| (path.to_string(), code.to_string()))
    );
    assert_eq!(app.repo.write_count(), 0);
}

#[tokio::test]
async fn test_every_resource_rejects_empty_patch_and_unknown_uuid() {
    let app = spawn_app();
    let missing = uuid_of('z');
    let not_found = json!({ "message": "Not Found" });

    for path in RESOURCE_PATHS {
        let uri = format!("{path}/{missing}");

        let (status, body) = app.json(Method::PATCH, &uri, json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "PATCH {{}} {path}");
        assert_eq!(issue_codes(&body), vec!["invalid_updates"], "{path}");

        let (status, body) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {path}");
        assert_eq!(body, not_found);

        let (status, body) = app
            .json(Method::PATCH, &uri, json!({ "created_at": CREATED_AT }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "PATCH {path}");
        assert_eq!(body, not_found);

        let (status, body) = app.delete(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {path}");
        assert_eq!(body, not_found);

        let (status, listed) = app.get(path).await;
        assert_eq!(status, StatusCode::OK, "GET {path}");
        assert_eq!(listed, json!([]));
    }

    assert_eq!(app.repo.write_count(), 0);
    assert!(app.storage.files().is_empty());
}

#[tokio::test]
async fn test_unknown_uuid_is_not_found_everywhere() {
    let app = spawn_app();
    let uri = format!("/v1/hr/department/{}", uuid_of('z'));

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not Found" }));

    let (status, body) = app
        .json(Method::PATCH, &uri, json!({ "name": "Physics" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not Found" }));

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not Found" }));
}

#[tokio::test]
async fn test_malformed_path_uuid_is_a_validation_error() {
    let app = spawn_app();

    let (status, body) = app.get("/v1/hr/department/short").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(issue_codes(&body), vec!["length"]);
    assert_eq!(body["error"]["issues"][0]["path"], json!(["uuid"]));
}

#[tokio::test]
async fn test_same_patch_twice_yields_same_state() {
    let app = spawn_app();
    let uuid = uuid_of('d');
    app.repo.seed(
        &DESIGNATION_TABLE,
        json!({ "id": 1, "uuid": uuid, "name": "Lecturer", "created_at": CREATED_AT }),
    );
    let uri = format!("/v1/hr/designation/{uuid}");
    let update = json!({ "name": "Senior Lecturer", "updated_at": "2024-04-01 10:00:00" });

    let (first_status, first) = app.json(Method::PATCH, &uri, update.clone()).await;
    let (second_status, second) = app.json(Method::PATCH, &uri, update).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(second["name"], "Senior Lecturer");
    assert_eq!(app.repo.rows(&DESIGNATION_TABLE).len(), 1);
}

#[tokio::test]
async fn test_row_style_delete_answers_no_content() {
    let app = spawn_app();
    let uuid = uuid_of('d');
    app.repo.seed(
        &DESIGNATION_TABLE,
        json!({ "id": 1, "uuid": uuid, "name": "Lecturer", "created_at": CREATED_AT }),
    );

    let (status, body) = app.delete(&format!("/v1/hr/designation/{uuid}")).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert!(app.repo.rows(&DESIGNATION_TABLE).is_empty());
}

#[tokio::test]
async fn test_toast_style_delete_names_the_row() {
    let app = spawn_app();
    let uuid = uuid_of('p');
    app.repo.seed(
        &DEPARTMENT_TABLE,
        json!({ "id": 1, "uuid": uuid, "name": "Physics", "created_at": CREATED_AT }),
    );

    let (status, body) = app.delete(&format!("/v1/hr/department/{uuid}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "type": "delete", "message": "Physics deleted" }));
}

#[tokio::test]
async fn test_item_defaults_fill_omitted_numbers() {
    let app = spawn_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/v1/procure/item",
            json!({
                "purchase_cost_center_uuid": uuid_of('c'),
                "name": "Projector",
                "created_at": CREATED_AT,
                "created_by": uuid_of('u'),
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Projector created");
    let rows = app.repo.rows(&ITEM_TABLE);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["vendor_price"], json!(0.0));
    assert_eq!(rows[0]["threshold"], json!(0.0));
    assert_eq!(rows[0]["lead_time"], json!(0));
}

#[tokio::test]
async fn test_user_password_is_stored_hashed() {
    let app = spawn_app();

    let (status, _) = app
        .json(
            Method::POST,
            "/v1/hr/users",
            json!({
                "name": "Rahim Uddin",
                "email": "rahim@example.edu",
                "pass": "secret-pass",
                "department_uuid": uuid_of('a'),
                "designation_uuid": uuid_of('b'),
                "status": true,
                "created_at": CREATED_AT,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let users = app.repo.rows(&USERS_TABLE);
    let stored = users[0]["pass"].as_str().unwrap();
    assert!(stored.starts_with("$argon2"));
    assert_ne!(stored, "secret-pass");

    let (status, listed) = app.get("/v1/hr/users").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed[0].get("pass").is_none());
}

#[tokio::test]
async fn test_faculty_create_keeps_only_its_own_columns() {
    let app = spawn_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/v1/portfolio/faculty",
            json!({
                "name": "Faculty of Science",
                "created_at": CREATED_AT,
                "created_by": uuid_of('u'),
                "remarks": "not writable",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body, json!({ "type": "create", "message": "Faculty of Science created" }));
    let rows = app.repo.rows(&FACULTY_TABLE);
    assert_eq!(rows[0]["name"], "Faculty of Science");
    assert!(rows[0].get("remarks").is_none());
}

#[tokio::test]
async fn test_work_order_entry_defaults_unit_price() {
    let app = spawn_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/v1/procure/item-work-order-entry",
            json!({
                "item_work_order_uuid": uuid_of('w'),
                "item_uuid": uuid_of('i'),
                "request_quantity": "12",
                "created_at": CREATED_AT,
                "created_by": uuid_of('u'),
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let rows = app.repo.rows(&ITEM_WORK_ORDER_ENTRY_TABLE);
    assert_eq!(rows[0]["request_quantity"], json!(12.0));
    assert_eq!(rows[0]["unit_price"], json!(0.0));
    assert_eq!(rows[0].get("provided_quantity"), None::<&Value>);
}

#[tokio::test]
async fn test_work_order_entry_rejects_non_positive_quantity() {
    let app = spawn_app();

    let (status, body) = app
        .json(
            Method::POST,
            "/v1/procure/item-work-order-entry",
            json!({
                "request_quantity": 0,
                "created_at": CREATED_AT,
                "created_by": uuid_of('u'),
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(issue_codes(&body), vec!["range"]);
    assert_eq!(
        body["error"]["issues"][0]["message"],
        "Number must be greater than 0"
    );
    assert_eq!(app.repo.write_count(), 0);
}
