use chrono::{Duration, NaiveDate, Utc};
use common::{ActivityStatus, ActivityType, LEGACY_STATUS_ALIASES};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Index, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::SeedConfig;
use crate::entity::activity;
use crate::error::AppError;
use crate::models::activity::ActivityDraft;
use crate::utils::activity::save_activity;

/// Run every startup step against a freshly connected database.
pub async fn prepare(db: &DatabaseConnection, config: &SeedConfig) -> Result<(), AppError> {
    ensure_indexes(db).await?;
    normalize_legacy_statuses(db).await?;
    if config.sample_data {
        seed_sample_activities(db).await?;
    }
    Ok(())
}

/// Rewrite rows still stored under a legacy status spelling to the canonical
/// one. Returns the number of rows changed.
pub async fn normalize_legacy_statuses(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let mut total = 0u64;
    for &(legacy, status) in LEGACY_STATUS_ALIASES {
        let result = activity::Entity::update_many()
            .col_expr(activity::Column::Status, Expr::value(status.as_str()))
            .filter(activity::Column::Status.eq(legacy))
            .exec(db)
            .await?;

        if result.rows_affected > 0 {
            info!(
                from = legacy,
                to = status.as_str(),
                rows = result.rows_affected,
                "Normalized legacy activity status"
            );
        }
        total += result.rows_affected;
    }
    Ok(total)
}

/// Ensure the listing indexes exist.
///
/// Listings sort by creation time and filter by start date; schema-sync only
/// creates indexes declared on the entity, so these are created here.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes = [
        ("idx_activity_created_at", activity::Column::CreatedAt),
        ("idx_activity_start_date", activity::Column::StartDate),
    ];

    for (name, column) in indexes {
        let stmt = Index::create()
            .if_not_exists()
            .name(name)
            .table(activity::Entity)
            .col(column)
            .to_owned();
        let sql = match db.get_database_backend() {
            DbBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
            _ => stmt.to_string(SqliteQueryBuilder),
        };

        match db.execute_unprepared(&sql).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}

struct SampleActivity {
    title: &'static str,
    description: &'static str,
    activity_type: ActivityType,
    status: ActivityStatus,
    start_offset_days: i64,
    end_offset_days: i64,
    time: &'static str,
    location: &'static str,
    coordinator: &'static str,
    participants: i32,
    tags: &'static [&'static str],
    requirements: &'static [&'static str],
}

const SAMPLE_ACTIVITIES: &[SampleActivity] = &[
    SampleActivity {
        title: "Curso de Desenvolvimento Web com Django",
        description: "Aprenda a desenvolver aplicações web modernas usando Django, um dos frameworks Python mais populares. O curso aborda desde conceitos básicos até técnicas avançadas de desenvolvimento.",
        activity_type: ActivityType::Course,
        status: ActivityStatus::Pending,
        start_offset_days: 30,
        end_offset_days: 90,
        time: "19:00 - 22:00",
        location: "Laboratório de Informática 1",
        coordinator: "Prof. Carlos Silva",
        participants: 25,
        tags: &["programação", "web", "python", "django"],
        requirements: &[
            "Conhecimentos básicos de Python",
            "Notebook próprio",
            "Disponibilidade para atividades práticas",
        ],
    },
    SampleActivity {
        title: "Workshop de Inteligência Artificial",
        description: "Workshop intensivo sobre IA e Machine Learning, explorando algoritmos, ferramentas e aplicações práticas na resolução de problemas reais.",
        activity_type: ActivityType::Workshop,
        status: ActivityStatus::InProgress,
        start_offset_days: -5,
        end_offset_days: 2,
        time: "14:00 - 18:00",
        location: "Auditório Principal",
        coordinator: "Profa. Ana Santos",
        participants: 40,
        tags: &["inteligência artificial", "machine learning", "tecnologia"],
        requirements: &[
            "Conhecimentos básicos de programação",
            "Interesse em IA e ML",
        ],
    },
    SampleActivity {
        title: "Seminário de Inovação Tecnológica",
        description: "Evento que reúne pesquisadores, estudantes e profissionais para discutir as últimas tendências em tecnologia e inovação.",
        activity_type: ActivityType::Seminar,
        status: ActivityStatus::Pending,
        start_offset_days: 15,
        end_offset_days: 15,
        time: "08:00 - 17:00",
        location: "Centro de Convenções",
        coordinator: "Prof. João Oliveira",
        participants: 100,
        tags: &["tecnologia", "inovação", "pesquisa"],
        requirements: &["Inscrição prévia obrigatória"],
    },
    SampleActivity {
        title: "Projeto de Extensão: Inclusão Digital",
        description: "Projeto voltado para levar conhecimentos de informática básica para comunidades carentes, promovendo inclusão digital.",
        activity_type: ActivityType::Extension,
        status: ActivityStatus::InProgress,
        start_offset_days: -60,
        end_offset_days: 120,
        time: "08:00 - 12:00",
        location: "Comunidades locais",
        coordinator: "Profa. Maria Fernanda",
        participants: 15,
        tags: &["extensão", "inclusão digital", "comunidade"],
        requirements: &[
            "Disponibilidade para trabalho em campo",
            "Conhecimentos básicos de informática",
        ],
    },
    SampleActivity {
        title: "Pesquisa em Computação Quântica",
        description: "Grupo de pesquisa dedicado ao estudo de algoritmos quânticos e suas aplicações em problemas computacionais complexos.",
        activity_type: ActivityType::Research,
        status: ActivityStatus::InProgress,
        start_offset_days: -180,
        end_offset_days: 365,
        time: "14:00 - 18:00",
        location: "Laboratório de Pesquisa Avançada",
        coordinator: "Prof. Roberto Andrade",
        participants: 8,
        tags: &["pesquisa", "computação quântica", "algoritmos"],
        requirements: &[
            "Graduação em Ciência da Computação ou áreas afins",
            "Conhecimentos avançados em matemática",
            "Dedicação de pelo menos 20h semanais",
        ],
    },
];

impl SampleActivity {
    fn draft(&self, today: NaiveDate) -> ActivityDraft {
        ActivityDraft {
            title: self.title.to_string(),
            description: self.description.to_string(),
            activity_type: self.activity_type,
            status: self.status,
            start_date: today + Duration::days(self.start_offset_days),
            end_date: today + Duration::days(self.end_offset_days),
            time: Some(self.time.to_string()),
            location: self.location.to_string(),
            coordinator: self.coordinator.to_string(),
            participants: self.participants,
            image_url: None,
            tags: self.tags.iter().map(|t| ToString::to_string(t)).collect(),
            requirements: self.requirements.iter().map(|r| ToString::to_string(r)).collect(),
        }
    }
}

/// Insert the sample catalogue. Activities are matched by title, so running
/// this again only adds the ones that are missing.
pub async fn seed_sample_activities(db: &DatabaseConnection) -> Result<u32, AppError> {
    let today = Utc::now().date_naive();
    let mut inserted = 0u32;

    for sample in SAMPLE_ACTIVITIES {
        let exists = activity::Entity::find()
            .filter(activity::Column::Title.eq(sample.title))
            .count(db)
            .await?
            > 0;
        if exists {
            tracing::debug!(title = sample.title, "Sample activity already present");
            continue;
        }

        save_activity(db, None, &sample.draft(today)).await?;
        inserted += 1;
    }

    if inserted > 0 {
        info!("Seeded {} sample activities", inserted);
    }
    Ok(inserted)
}
