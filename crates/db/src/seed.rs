//! Demo content for development stores.
//!
//! [`seed_demo_content`] empties the experience, skills and certificates
//! collections and refills them with a small fixed set of entries. Designs,
//! projects, messages and the profile are left untouched.

use std::sync::Arc;

use folio_core::content::{
    Certificate, Collection, Experience, ExperienceType, Skill, SkillType,
};

use crate::repositories::CollectionRepo;
use crate::store::{DocumentStore, Query, StoreError};

/// Entry counts written by [`seed_demo_content`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub experience: usize,
    pub skills: usize,
    pub certificates: usize,
}

/// Delete every document in `collection`, decodable or not. Returns the
/// number removed.
pub async fn clear_collection(
    store: &Arc<dyn DocumentStore>,
    collection: Collection,
) -> Result<usize, StoreError> {
    let docs = store.query(&Query::collection(collection)).await?;
    for doc in &docs {
        store.delete(collection.name(), &doc.id).await?;
    }
    tracing::info!(%collection, removed = docs.len(), "Collection cleared");
    Ok(docs.len())
}

/// Reset the seeded collections to the demo set. Entries are written in
/// list order, so skills keep their creation order on screen.
pub async fn seed_demo_content(store: &Arc<dyn DocumentStore>) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    clear_collection(store, Collection::Experience).await?;
    let repo = CollectionRepo::<Experience>::new(Arc::clone(store));
    for entry in demo_experience() {
        repo.create(&entry).await?;
        report.experience += 1;
    }

    clear_collection(store, Collection::Skills).await?;
    let repo = CollectionRepo::<Skill>::new(Arc::clone(store));
    for entry in demo_skills() {
        repo.create(&entry).await?;
        report.skills += 1;
    }

    clear_collection(store, Collection::Certificates).await?;
    let repo = CollectionRepo::<Certificate>::new(Arc::clone(store));
    for entry in demo_certificates() {
        repo.create(&entry).await?;
        report.certificates += 1;
    }

    tracing::info!(
        experience = report.experience,
        skills = report.skills,
        certificates = report.certificates,
        "Demo content seeded"
    );
    Ok(report)
}

fn experience(
    kind: ExperienceType,
    role: &str,
    organization: &str,
    (start_date, end_date): (&str, &str),
    description: &str,
) -> Experience {
    Experience {
        experience_type: kind,
        role: role.into(),
        organization: organization.into(),
        start_date: start_date.into(),
        end_date: end_date.into(),
        is_current: end_date.is_empty(),
        description: description.into(),
    }
}

fn demo_experience() -> Vec<Experience> {
    vec![
        experience(
            ExperienceType::Work,
            "Trainee Assistant",
            "Regional Savings Bank",
            ("2021-07", "2022-01"),
            "Assisted with daily branch operations and administrative work.",
        ),
        experience(
            ExperienceType::Work,
            "Frontend Intern",
            "Harbor Labs",
            ("2024-06", ""),
            "Builds responsive interfaces for internal dashboards.",
        ),
        experience(
            ExperienceType::Volunteering,
            "Chairperson",
            "Women in Engineering Student Group",
            ("2025-08", ""),
            "Leads the group and organises workshops for students in STEM.",
        ),
        experience(
            ExperienceType::Volunteering,
            "Graphic Designer",
            "University Media Unit",
            ("2023-01", "2025-12"),
            "Designed posters, flyers and social media creatives for campus events.",
        ),
    ]
}

fn skill(kind: SkillType, name: &str, icon_name: &str, color: &str, description: &str) -> Skill {
    Skill {
        skill_type: kind,
        name: name.into(),
        icon_name: icon_name.into(),
        color: color.into(),
        description: description.into(),
    }
}

fn demo_skills() -> Vec<Skill> {
    use SkillType::{Skill as S, Tool as T};
    vec![
        skill(S, "UI/UX Design", "Palette", "text-purple-400", "Intuitive, good-looking user interfaces."),
        skill(S, "Graphic Design", "PenTool", "text-pink-400", "Visual content for digital and print."),
        skill(S, "Frontend Web Development", "Code2", "text-blue-500", "Responsive, fast web applications."),
        skill(S, "Project Management", "Briefcase", "text-emerald-500", "Taking projects from idea to delivery."),
        skill(T, "Figma", "Figma", "text-pink-400", "Interface design and prototyping."),
        skill(T, "Tailwind CSS", "Wind", "text-cyan-500", "Utility-first styling."),
        skill(T, "Git", "GitBranch", "text-orange-400", "Version control."),
        skill(T, "Notion", "Book", "text-white", "Notes, tasks and planning."),
    ]
}

fn demo_certificates() -> Vec<Certificate> {
    vec![
        Certificate {
            title: "24-Hour Programming Competition: Participation".into(),
            issuer: "IEEE".into(),
            date: "2024-10".into(),
            description: "Took part in a global 24-hour programming contest.".into(),
            link: "https://ieeextreme.org/".into(),
            image_url: String::new(),
        },
        Certificate {
            title: "API Fundamentals Student Expert".into(),
            issuer: "Postman".into(),
            date: "2025-05".into(),
            description: "API design, testing and documentation basics.".into(),
            link: String::new(),
            image_url: String::new(),
        },
    ]
}
