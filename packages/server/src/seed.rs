use chrono::Utc;
use common::{Availability, Department, ServiceCategory, TeamCategory};
use sea_orm::*;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::entity::{service, team_member};

struct SeedMember {
    name: &'static str,
    title: &'static str,
    bio: &'static str,
    specialties: &'static [&'static str],
    credentials: &'static [&'static str],
    experience: Option<&'static str>,
    category: TeamCategory,
    department: Department,
}

/// Default roster, in display order.
const DEFAULT_TEAM: &[SeedMember] = &[
    SeedMember {
        name: "Alex Morgan",
        title: "Founder & CEO",
        bio: "Leads company strategy and client partnerships, with a background in data analytics and applied machine learning.",
        specialties: &["Strategic Leadership", "AI Strategy", "Cloud Architecture"],
        credentials: &["10+ Years Experience"],
        experience: Some("10+ Years"),
        category: TeamCategory::Leadership,
        department: Department::Management,
    },
    SeedMember {
        name: "Jordan Lee",
        title: "Chief Technology Officer",
        bio: "Oversees the technical direction of client platforms, specializing in distributed systems and machine learning infrastructure.",
        specialties: &["Machine Learning", "Distributed Systems", "Technical Strategy"],
        credentials: &["PhD Computer Science"],
        experience: Some("12+ Years"),
        category: TeamCategory::Leadership,
        department: Department::Research,
    },
    SeedMember {
        name: "Sam Rivera",
        title: "Lead ML Engineer",
        bio: "Builds production machine learning systems and model deployment pipelines.",
        specialties: &["MLOps", "Model Deployment"],
        credentials: &[],
        experience: None,
        category: TeamCategory::Core,
        department: Department::Engineering,
    },
    SeedMember {
        name: "Taylor Brooks",
        title: "Data Engineering Lead",
        bio: "Designs scalable data platforms and real-time processing pipelines.",
        specialties: &["Data Pipelines", "Cloud Architecture", "Real-time Processing"],
        credentials: &[],
        experience: None,
        category: TeamCategory::Core,
        department: Department::Engineering,
    },
    SeedMember {
        name: "Casey Nguyen",
        title: "Business Intelligence Architect",
        bio: "Turns operational data into dashboards and reporting that teams actually use.",
        specialties: &["Business Intelligence", "Data Visualization"],
        credentials: &[],
        experience: None,
        category: TeamCategory::Core,
        department: Department::Analytics,
    },
];

struct SeedService {
    name: &'static str,
    short: &'static str,
    full: &'static str,
    category: ServiceCategory,
    icon: &'static str,
    features: &'static [&'static str],
    technologies: &'static [&'static str],
    tags: &'static [&'static str],
    popularity: i32,
    featured: bool,
}

/// Default catalogue, in display order.
const DEFAULT_SERVICES: &[SeedService] = &[
    SeedService {
        name: "Dataset Acquisition",
        short: "Sourcing, licensing and cleaning the data your models need.",
        full: "We identify, acquire and prepare high-quality datasets, handling licensing, quality checks and documentation so your teams start from reliable data.",
        category: ServiceCategory::Foundation,
        icon: "database",
        features: &["Data sourcing", "Quality assessment", "Documentation"],
        technologies: &["Python", "SQL"],
        tags: &["data", "datasets"],
        popularity: 9,
        featured: true,
    },
    SeedService {
        name: "Pipeline Architecture",
        short: "Reliable batch and streaming pipelines built for scale.",
        full: "We design and build data pipelines that move and transform data reliably, with monitoring and testing from day one.",
        category: ServiceCategory::Foundation,
        icon: "workflow",
        features: &["Batch and streaming", "Orchestration", "Monitoring"],
        technologies: &["Airflow", "Kafka", "Spark"],
        tags: &["pipelines", "etl", "data-engineering"],
        popularity: 8,
        featured: false,
    },
    SeedService {
        name: "Algorithm Development",
        short: "Custom models and algorithms tailored to your problem.",
        full: "From problem framing to validated models, we develop algorithms that fit your data and your constraints.",
        category: ServiceCategory::Analytics,
        icon: "cpu",
        features: &["Problem framing", "Model development", "Validation"],
        technologies: &["Python", "scikit-learn", "PyTorch"],
        tags: &["machine-learning", "models"],
        popularity: 10,
        featured: true,
    },
    SeedService {
        name: "Predictive Analytics",
        short: "Forecasts and risk scores that drive decisions.",
        full: "We build forecasting and scoring models and put them where decisions are made, with clear explanations of what drives each prediction.",
        category: ServiceCategory::Analytics,
        icon: "trending-up",
        features: &["Forecasting", "Risk scoring", "Explainability"],
        technologies: &["Python", "XGBoost"],
        tags: &["forecasting", "analytics"],
        popularity: 9,
        featured: false,
    },
    SeedService {
        name: "LLM Integration",
        short: "Large language models wired safely into your products.",
        full: "We integrate large language models into existing products and workflows, with retrieval, evaluation and guardrails.",
        category: ServiceCategory::Ai,
        icon: "message-square",
        features: &["Retrieval augmented generation", "Evaluation", "Guardrails"],
        technologies: &["OpenAI", "LangChain", "Vector databases"],
        tags: &["llm", "ai", "genai"],
        popularity: 9,
        featured: true,
    },
    SeedService {
        name: "Data Governance",
        short: "Policies, lineage and access control for trusted data.",
        full: "We put governance in place that keeps data discoverable, compliant and secure without slowing teams down.",
        category: ServiceCategory::Governance,
        icon: "shield",
        features: &["Data catalogue", "Lineage", "Access policies"],
        technologies: &["dbt", "OpenLineage"],
        tags: &["governance", "compliance"],
        popularity: 7,
        featured: false,
    },
];

/// Seed the `team_member` and `service` tables when both are empty.
///
/// Returns whether anything was inserted.
pub async fn seed_catalogue(db: &DatabaseConnection) -> Result<bool, DbErr> {
    let members = team_member::Entity::find().count(db).await?;
    let services = service::Entity::find().count(db).await?;
    if members > 0 || services > 0 {
        return Ok(false);
    }

    let now = Utc::now();

    let team = DEFAULT_TEAM
        .iter()
        .zip(1..)
        .map(|(m, order)| team_member::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(m.name.to_string()),
            title: Set(m.title.to_string()),
            bio: Set(m.bio.to_string()),
            email: Set(None),
            phone: Set(None),
            photo_url: Set(None),
            experience: Set(m.experience.map(str::to_string)),
            specialties: Set(json!(m.specialties)),
            credentials: Set(json!(m.credentials)),
            category: Set(m.category),
            department: Set(m.department),
            is_active: Set(true),
            display_order: Set(order),
            created_at: Set(now),
            updated_at: Set(now),
        });
    team_member::Entity::insert_many(team)
        .exec_without_returning(db)
        .await?;

    let catalogue = DEFAULT_SERVICES
        .iter()
        .zip(1..)
        .map(|(s, order)| service::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(s.name.to_string()),
            short_description: Set(s.short.to_string()),
            full_description: Set(s.full.to_string()),
            category: Set(s.category),
            subcategory: Set(None),
            icon: Set(s.icon.to_string()),
            features: Set(json!(s.features)),
            technologies: Set(json!(s.technologies)),
            tags: Set(json!(s.tags)),
            availability: Set(Availability::Available),
            popularity: Set(s.popularity),
            is_active: Set(true),
            is_featured: Set(s.featured),
            display_order: Set(order),
            created_at: Set(now),
            updated_at: Set(now),
        });
    service::Entity::insert_many(catalogue)
        .exec_without_returning(db)
        .await?;

    info!(
        team_members = DEFAULT_TEAM.len(),
        services = DEFAULT_SERVICES.len(),
        "Seeded default catalogue"
    );
    Ok(true)
}
