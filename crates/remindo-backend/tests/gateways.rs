// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway tests against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use remindo_backend::{AlarmGateway, BackendClient, NoteGateway, ThemeGateway, UserGateway};
use remindo_core::models::{
    AlarmLinks, AlarmStatus, AlarmToCreate, FieldPatch, ThemeLinks, ThemeToCreate, User,
};
use remindo_core::{AlarmStore, NoteStore, NotFoundExt, StorageError, ThemeStore, UserStore};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Arc<BackendClient> {
    Arc::new(
        BackendClient::new(
            server.uri(),
            "service",
            SecretString::from("pw".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_token("token"),
    )
}

fn alarm_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": "Pills",
        "description": "after lunch",
        "is_repeatable": false,
        "status": status,
        "links": {"user_id": "42", "parent_id": "n1"},
        "times": {
            "creation_time": "2026-01-01T10:00:00",
            "next_notion_time": "2026-01-02T13:00:00",
            "end_time": null,
            "repeat_interval": null
        }
    })
}

#[tokio::test]
async fn theme_create_posts_body_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/themes/create_theme"))
        .and(body_json(json!({
            "name": "Work",
            "description": "Tasks",
            "links": {"user_id": "42"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json("t-new"))
        .expect(1)
        .mount(&server)
        .await;

    let themes = ThemeGateway::new(client(&server));
    let id = themes
        .create(&ThemeToCreate {
            name: "Work".into(),
            description: Some("Tasks".into()),
            links: ThemeLinks {
                user_id: "42".into(),
            },
        })
        .await
        .unwrap();
    assert_eq!(id, "t-new");
}

#[tokio::test]
async fn theme_get_maps_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/themes/get_theme/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "ok", "name": "Home", "description": null, "links": {"user_id": "42"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/themes/get_theme/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/themes/get_theme/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\": 1}"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/themes/get_theme/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let themes = ThemeGateway::new(client(&server));
    let theme = themes.get("ok").await.unwrap();
    assert_eq!(theme.name, "Home");
    assert!(theme.description.is_none());

    assert!(matches!(
        themes.get("missing").await,
        Err(StorageError::NotFound { entity: "theme" })
    ));
    assert!(matches!(
        themes.get("broken").await,
        Err(StorageError::Validation { .. })
    ));
    assert!(matches!(
        themes.get("teapot").await,
        Err(StorageError::UnexpectedResponse { status: 418, .. })
    ));
}

#[tokio::test]
async fn theme_patch_sends_only_given_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/themes/update_theme/t1"))
        .and(body_json(json!({"description": "new"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let themes = ThemeGateway::new(client(&server));
    let mut patch = FieldPatch::new();
    patch.insert("description".into(), json!("new"));
    themes.patch("t1", &patch).await.unwrap();
}

#[tokio::test]
async fn empty_theme_note_list_folds_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes/get_all_notes_by_theme_id/t1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let notes = NoteGateway::new(client(&server));
    for _ in 0..3 {
        let listed = notes.get_all_by_theme("t1").await.or_empty().unwrap();
        assert!(listed.is_empty());
    }
}

#[tokio::test]
async fn note_create_rejection_is_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes/create_note"))
        .respond_with(ResponseTemplate::new(422).set_body_string("{\"detail\":\"name\"}"))
        .mount(&server)
        .await;

    let notes = NoteGateway::new(client(&server));
    let err = notes
        .create(&remindo_core::models::NoteToCreate {
            name: String::new(),
            links: remindo_core::models::NoteLinks {
                user_id: "42".into(),
                theme_id: "t1".into(),
            },
            data: Default::default(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Validation { detail } if detail.contains("name")));
}

#[tokio::test]
async fn alarm_create_passes_schedule_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/alarms/create_alarm"))
        .and(query_param("next_notion_time", "2026-05-04T09:15:00"))
        .and(query_param("repeat_interval", "600"))
        .respond_with(ResponseTemplate::new(201).set_body_string("a-new"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/alarms/create_alarm"))
        .and(query_param_is_missing("repeat_interval"))
        .respond_with(ResponseTemplate::new(201).set_body_string("a-once"))
        .expect(1)
        .mount(&server)
        .await;

    let alarms = AlarmGateway::new(client(&server));
    let alarm = AlarmToCreate {
        name: "Stretch".into(),
        description: None,
        is_repeatable: true,
        links: AlarmLinks {
            user_id: "42".into(),
            parent_id: "n1".into(),
        },
    };
    let at = NaiveDate::from_ymd_opt(2026, 5, 4)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    assert_eq!(alarms.create(&alarm, at, Some(600)).await.unwrap(), "a-new");

    let once = AlarmToCreate {
        is_repeatable: false,
        ..alarm
    };
    assert_eq!(alarms.create(&once, at, None).await.unwrap(), "a-once");
}

#[tokio::test]
async fn alarm_postpone_parses_backend_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/alarms/postpone_repeatable_alarm/a1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"next_notion_time": "2026-05-04 10:15:00.123456"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/alarms/postpone_repeatable_alarm/a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 1})))
        .mount(&server)
        .await;

    let alarms = AlarmGateway::new(client(&server));
    let next = alarms.postpone("a1").await.unwrap();
    assert_eq!(next.to_string(), "2026-05-04 10:15:00");
    assert!(matches!(
        alarms.postpone("a2").await,
        Err(StorageError::Validation { .. })
    ));
}

#[tokio::test]
async fn alarm_ready_list_and_status_update() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alarms/get_all_ready_alarms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([alarm_json("a1", "READY")])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/alarms/update_alarm_status/a1"))
        .and(query_param("new_status", "FINISH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let alarms = AlarmGateway::new(client(&server));
    let ready = alarms.get_all_ready().await.unwrap();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].status, AlarmStatus::Ready);
    alarms
        .update_status("a1", AlarmStatus::Finished)
        .await
        .unwrap();
}

#[tokio::test]
async fn user_create_conflict_is_duplicate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/create_user"))
        .and(body_json(json!({
            "telegram_id": "42",
            "user_name": "ann",
            "lang_code": "ru",
            "timezone_offset": 0,
            "first_name": "Ann",
            "last_name": null
        })))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let users = UserGateway::new(client(&server));
    let err = users
        .create(&User {
            telegram_id: "42".into(),
            display_name: "ann".into(),
            language_code: "ru".into(),
            timezone_offset: 0,
            first_name: Some("Ann".into()),
            last_name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Duplicate { entity: "user" }));
}

#[tokio::test]
async fn user_delete_zero_count_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/delete_user/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/delete_user/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0"))
        .mount(&server)
        .await;

    let users = UserGateway::new(client(&server));
    users.delete("1").await.unwrap();
    assert!(matches!(
        users.delete("2").await,
        Err(StorageError::NotFound { .. })
    ));
}

#[tokio::test]
async fn patch_replays_after_reauth_and_reports_replay_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/jwt/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "new"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/alarms/update_alarm/a1"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/alarms/update_alarm/a1"))
        .respond_with(ResponseTemplate::new(422).set_body_string("bad field"))
        .expect(1)
        .mount(&server)
        .await;

    let alarms = AlarmGateway::new(client(&server));
    let mut patch = FieldPatch::new();
    patch.insert("name".into(), json!(""));
    let err = alarms.patch("a1", &patch).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation { detail } if detail == "bad field"));
}
