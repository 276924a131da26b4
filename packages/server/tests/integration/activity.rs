use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use serde_json::json;

use server::entity::{activity_requirement, activity_tag_link};

use crate::common::{TestApp, activity_payload, routes};

mod activity_creation {
    use super::*;

    #[tokio::test]
    async fn valid_form_round_trips_through_detail() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::NEW_ACTIVITY, &activity_payload("Curso de Django"))
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "Curso de Django");
        assert_eq!(res.body["type"], "COURSE");
        assert_eq!(res.body["status"], "PENDING");
        assert_eq!(res.body["status_bucket"], "upcoming");
        assert!(res.body["created_at"].is_string());

        let detail = app.get(&routes::activity(res.id())).await;
        assert_eq!(detail.status, 200);
        let activity = &detail.body["activity"];
        assert_eq!(activity["title"], "Curso de Django");
        assert_eq!(activity["start_date"], "2025-03-01");
        assert_eq!(activity["end_date"], "2025-05-30");
        assert_eq!(activity["time"], "19:00 - 22:00");
        assert_eq!(activity["participants"], 25);

        let tags: Vec<&str> = activity["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(tags, vec!["python", "web"]);

        let requirements: Vec<&str> = activity["requirements"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["requirement"].as_str().unwrap())
            .collect();
        assert_eq!(
            requirements,
            vec!["Notebook próprio", "Conhecimentos básicos de Python"]
        );
    }

    #[tokio::test]
    async fn urlencoded_form_is_accepted() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::NEW_ACTIVITY,
                &[
                    ("title", "Workshop de IA"),
                    ("description", "Workshop intensivo sobre IA e ML."),
                    ("type", "workshop"),
                    ("status", "ACTIVE"),
                    ("start_date", "2025-04-01"),
                    ("end_date", "2025-04-01"),
                    ("location", "Auditório Principal"),
                    ("coordinator", "Profa. Ana Santos"),
                    ("participants", "40"),
                    ("tags", "ia, ml"),
                    ("requirements", ""),
                ],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["type"], "WORKSHOP");
        assert_eq!(res.body["status"], "IN_PROGRESS");
        assert_eq!(res.body["requirements"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn duplicate_tags_collapse_to_one_link() {
        let app = TestApp::spawn().await;

        let mut body = activity_payload("Seminário");
        body["tags"] = json!("a, b, a,  , b");
        let id = app.create_activity_with(body).await;

        let detail = app.get(&routes::activity(id)).await;
        assert_eq!(detail.body["activity"]["tags"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn blank_optional_fields_are_stored_as_null() {
        let app = TestApp::spawn().await;

        let mut body = activity_payload("Pesquisa");
        body["time"] = json!("   ");
        body["image_url"] = json!("");
        let id = app.create_activity_with(body).await;

        let detail = app.get(&routes::activity(id)).await;
        assert!(detail.body["activity"]["time"].is_null());
        assert!(detail.body["activity"]["image_url"].is_null());
    }

    #[tokio::test]
    async fn end_before_start_is_rejected_and_nothing_is_stored() {
        let app = TestApp::spawn().await;

        let mut body = activity_payload("Curso invertido");
        body["start_date"] = json!("2025-06-01");
        body["end_date"] = json!("2025-05-01");
        let res = app.post_json(routes::NEW_ACTIVITY, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "End date must not be before start date");

        let list = app.get(routes::ACTIVITIES).await;
        assert_eq!(list.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn short_title_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::NEW_ACTIVITY, &activity_payload("ab"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Title must be at least 3 characters");
    }

    #[tokio::test]
    async fn missing_tags_are_rejected() {
        let app = TestApp::spawn().await;

        let mut body = activity_payload("Sem tags");
        body["tags"] = json!(" , ");
        let res = app.post_json(routes::NEW_ACTIVITY, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Add at least one tag");
    }

    #[tokio::test]
    async fn unknown_type_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let mut body = activity_payload("Tipo estranho");
        body["type"] = json!("PARTY");
        let res = app.post_json(routes::NEW_ACTIVITY, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod activity_update {
    use super::*;

    #[tokio::test]
    async fn edit_form_reflects_current_values() {
        let app = TestApp::spawn().await;
        let id = app.create_activity("Curso de Rust").await;

        let res = app.get(&routes::edit_activity(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["form"]["tags"], "python, web");
        assert_eq!(
            res.body["form"]["requirements"],
            "Notebook próprio\nConhecimentos básicos de Python"
        );
        assert!(res.body["choices"]["types"].is_array());
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_replaces_tags() {
        let app = TestApp::spawn().await;
        let id = app.create_activity("Curso de Rust").await;

        let mut body = activity_payload("Curso de Rust Avançado");
        body["status"] = json!("COMPLETED");
        body["tags"] = json!("rust");
        let res = app.post_json(&routes::edit_activity(id), &body).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Curso de Rust Avançado");
        assert_eq!(res.body["status_bucket"], "completed");
        let tags = res.body["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0]["name"], "rust");
    }

    #[tokio::test]
    async fn empty_requirements_clear_the_list() {
        let app = TestApp::spawn().await;
        let id = app.create_activity("Curso de Rust").await;

        let mut body = activity_payload("Curso de Rust");
        body["requirements"] = json!("");
        let res = app.post_json(&routes::edit_activity(id), &body).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let detail = app.get(&routes::activity(id)).await;
        assert_eq!(
            detail.body["activity"]["requirements"]
                .as_array()
                .unwrap()
                .len(),
            0
        );
    }

    #[tokio::test]
    async fn invalid_update_leaves_activity_unchanged() {
        let app = TestApp::spawn().await;
        let id = app.create_activity("Curso de Rust").await;

        let mut body = activity_payload("Outro título");
        body["end_date"] = json!("2020-01-01");
        body["tags"] = json!("outra");
        let res = app.post_json(&routes::edit_activity(id), &body).await;
        assert_eq!(res.status, 400);

        let detail = app.get(&routes::activity(id)).await;
        assert_eq!(detail.body["activity"]["title"], "Curso de Rust");
        assert_eq!(detail.body["activity"]["tags"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_activity_returns_404() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(&routes::edit_activity(999), &activity_payload("Fantasma"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn invalid_update_of_missing_activity_returns_404() {
        let app = TestApp::spawn().await;
        let mut body = activity_payload("Fantasma");
        body["title"] = json!("ab");

        let res = app.post_json(&routes::edit_activity(999), &body).await;

        assert_eq!(res.status, 404, "{}", res.text);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod activity_deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_the_activity() {
        let app = TestApp::spawn().await;
        let id = app.create_activity("Curso descartável").await;

        let res = app.post_empty(&routes::delete_activity(id)).await;
        assert_eq!(res.status, 204);

        let detail = app.get(&routes::activity(id)).await;
        assert_eq!(detail.status, 404);

        let requirements = activity_requirement::Entity::find()
            .count(&app.db)
            .await
            .unwrap();
        let links = activity_tag_link::Entity::find()
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(requirements, 0);
        assert_eq!(links, 0);
    }

    #[tokio::test]
    async fn tags_survive_deletion_and_are_reused() {
        let app = TestApp::spawn().await;
        let first = app.create_activity("Primeiro curso").await;
        app.post_empty(&routes::delete_activity(first)).await;

        let second = app.create_activity("Segundo curso").await;
        let detail = app.get(&routes::activity(second)).await;
        assert_eq!(detail.body["activity"]["tags"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_of_missing_activity_returns_404() {
        let app = TestApp::spawn().await;

        let res = app.post_empty(&routes::delete_activity(42)).await;
        assert_eq!(res.status, 404);
    }
}

mod activity_detail {
    use super::*;

    #[tokio::test]
    async fn missing_activity_returns_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::activity(12345)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app.get(&routes::edit_activity(12345)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn non_numeric_id_returns_json_404() {
        let app = TestApp::spawn().await;

        for path in ["/atividades/abc/", "/atividades/edit/abc/"] {
            let res = app.get(path).await;
            assert_eq!(res.status, 404, "{path}: {}", res.text);
            assert_eq!(res.body["code"], "NOT_FOUND");
            assert!(res.body["message"].is_string());
        }

        let res = app.post_empty("/atividades/delete/abc/").await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn rows_with_legacy_status_are_readable() {
        let app = TestApp::spawn().await;
        let id = app.create_activity("Curso antigo").await;
        app.db
            .execute_unprepared("UPDATE activity SET status = 'UPCOMING'")
            .await
            .unwrap();

        let detail = app.get(&routes::activity(id)).await;
        assert_eq!(detail.status, 200, "{}", detail.text);
        assert_eq!(detail.body["activity"]["status"], "PENDING");

        let list = app
            .get(&format!("{}?status=UPCOMING", routes::ACTIVITIES))
            .await;
        assert_eq!(list.status, 200, "{}", list.text);
        assert_eq!(list.titles(), vec!["Curso antigo"]);
        assert_eq!(list.body["data"][0]["status"], "PENDING");

        let dashboard = app.get(routes::DASHBOARD).await;
        assert_eq!(dashboard.status, 200, "{}", dashboard.text);
        assert_eq!(dashboard.body["by_status"]["upcoming"], 1);
    }
}

mod activity_listing {
    use super::*;

    #[tokio::test]
    async fn pages_hold_twelve_newest_first() {
        let app = TestApp::spawn().await;
        for i in 1..=13 {
            app.create_activity(&format!("Atividade {i:02}")).await;
        }

        let first = app.get(routes::ACTIVITIES).await;
        assert_eq!(first.status, 200);
        assert_eq!(first.body["pagination"]["total"], 13);
        assert_eq!(first.body["pagination"]["total_pages"], 2);
        let titles = first.titles();
        assert_eq!(titles.len(), 12);
        assert_eq!(titles[0], "Atividade 13");

        let second = app.get(&format!("{}?page=2", routes::ACTIVITIES)).await;
        assert_eq!(second.titles(), vec!["Atividade 01"]);

        let bogus = app.get(&format!("{}?page=abc", routes::ACTIVITIES)).await;
        assert_eq!(bogus.body["pagination"]["page"], 1);

        let beyond = app.get(&format!("{}?page=9", routes::ACTIVITIES)).await;
        assert_eq!(beyond.titles().len(), 0);
    }

    #[tokio::test]
    async fn filters_by_text_type_and_date() {
        let app = TestApp::spawn().await;
        app.create_activity("Curso de Python").await;

        let mut body = activity_payload("Workshop de Robótica");
        body["type"] = json!("WORKSHOP");
        body["start_date"] = json!("2025-08-01");
        body["end_date"] = json!("2025-08-02");
        app.create_activity_with(body).await;

        let res = app
            .get(&format!("{}?search=PYTHON", routes::ACTIVITIES))
            .await;
        assert_eq!(res.titles(), vec!["Curso de Python"]);

        let res = app
            .get(&format!("{}?type=WORKSHOP", routes::ACTIVITIES))
            .await;
        assert_eq!(res.titles(), vec!["Workshop de Robótica"]);
        assert_eq!(res.body["filters"]["type"], "WORKSHOP");

        let res = app
            .get(&format!("{}?start_date=2025-07-01", routes::ACTIVITIES))
            .await;
        assert_eq!(res.titles(), vec!["Workshop de Robótica"]);

        let res = app
            .get(&format!("{}?end_date=2025-07-01", routes::ACTIVITIES))
            .await;
        assert_eq!(res.titles(), vec!["Curso de Python"]);
    }

    #[tokio::test]
    async fn unknown_filter_values_are_ignored() {
        let app = TestApp::spawn().await;
        app.create_activity("Curso de Python").await;

        let res = app
            .get(&format!(
                "{}?type=PARTY&status=archived&start_date=yesterday",
                routes::ACTIVITIES
            ))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.titles().len(), 1);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        app.create_activity("Curso de Python").await;

        let res = app
            .get(&format!("{}?page=18446744073709551615", routes::ACTIVITIES))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.titles().is_empty());
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["pagination"]["total_pages"], 1);

        let res = app.get(&format!("{}?page=2", routes::ACTIVITIES)).await;
        assert_eq!(res.status, 200);
        assert!(res.titles().is_empty());
    }

    #[tokio::test]
    async fn legacy_status_filter_matches_canonical_rows() {
        let app = TestApp::spawn().await;
        app.create_activity("Curso pendente").await;

        let mut body = activity_payload("Curso em andamento");
        body["status"] = json!("IN_PROGRESS");
        app.create_activity_with(body).await;

        let res = app
            .get(&format!("{}?status=UPCOMING", routes::ACTIVITIES))
            .await;
        assert_eq!(res.titles(), vec!["Curso pendente"]);
        assert_eq!(res.body["filters"]["status"], "PENDING");

        let res = app.get(&format!("{}?status=active", routes::ACTIVITIES)).await;
        assert_eq!(res.titles(), vec!["Curso em andamento"]);
    }
}

mod activity_search {
    use super::*;

    #[tokio::test]
    async fn search_matches_coordinator_and_ignores_dates() {
        let app = TestApp::spawn().await;
        app.create_activity("Curso de Python").await;

        let mut body = activity_payload("Seminário de Inovação");
        body["coordinator"] = json!("Prof. João Oliveira");
        app.create_activity_with(body).await;

        let res = app
            .get(&format!(
                "{}?search=oliveira&start_date=2030-01-01",
                routes::SEARCH
            ))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.titles(), vec!["Seminário de Inovação"]);
        assert_eq!(res.body["total"], 1);
        assert!(res.body["filters"]["start_date"].is_null());
    }

    #[tokio::test]
    async fn like_wildcards_are_matched_literally() {
        let app = TestApp::spawn().await;
        app.create_activity("Curso de Python").await;

        let mut body = activity_payload("Desconto de 100% no curso");
        body["tags"] = json!("promo");
        app.create_activity_with(body).await;

        let res = app.get(&format!("{}?search=100%25", routes::SEARCH)).await;
        assert_eq!(res.titles(), vec!["Desconto de 100% no curso"]);

        let res = app.get(&format!("{}?search=_", routes::SEARCH)).await;
        assert_eq!(res.titles().len(), 0);
    }
}
