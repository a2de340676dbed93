use chrono::Local;
use clap::Args;
use std::sync::Arc;

use platewise::config::AppConfig;
use platewise::error::AppError;
use platewise::site::careers::{
    stats, CareersStore, EmploymentType, NewApplication, NewVacancy, SqliteCareersStore,
    VacancyStatus,
};
use platewise::site::db;
use platewise::site::leads::{
    FormType, LeadIntakeService, LeadSubmission, NotificationFanout, SqliteLeadRepository,
};

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Number of sample leads to store alongside the careers data
    #[arg(long, default_value_t = 3)]
    pub(crate) leads: u32,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// Emit the snapshot as pretty-printed JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

const SAMPLE_CANDIDATES: [(&str, &str); 2] = [
    ("Alex Reyes", "alex.reyes@example.com"),
    ("Morgan Blake", "morgan.blake@example.com"),
];

const SAMPLE_LEADS: [(&str, &str, &str); 3] = [
    ("Jane Doe", "jane.doe@example.com", "Acme Bistro"),
    ("Luis Ortega", "luis.ortega@example.com", "Taqueria Norte"),
    ("Priya Shah", "priya.shah@example.com", "Spice Route Kitchen"),
];

const FORM_ROTATION: [FormType; 4] = [
    FormType::Demo,
    FormType::Contact,
    FormType::Trial,
    FormType::Newsletter,
];

fn sample_vacancies() -> Vec<NewVacancy> {
    vec![
        NewVacancy {
            title: "Head Chef".to_string(),
            department: "Kitchen".to_string(),
            location: "Des Moines, IA".to_string(),
            employment_type: EmploymentType::FullTime,
            status: VacancyStatus::Active,
        },
        NewVacancy {
            title: "Line Cook".to_string(),
            department: "Kitchen".to_string(),
            location: "Cedar Rapids, IA".to_string(),
            employment_type: EmploymentType::PartTime,
            status: VacancyStatus::Active,
        },
        NewVacancy {
            title: "Onboarding Specialist".to_string(),
            department: "Customer Success".to_string(),
            location: "Remote".to_string(),
            employment_type: EmploymentType::FullTime,
            status: VacancyStatus::Active,
        },
        NewVacancy {
            title: "Platform Engineer".to_string(),
            department: "Engineering".to_string(),
            location: "Remote".to_string(),
            employment_type: EmploymentType::Contract,
            status: VacancyStatus::Active,
        },
    ]
}

pub(crate) async fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    let store = SqliteCareersStore::new(pool.clone());

    println!("Seeding careers data");
    let mut first_vacancy = None;
    for vacancy in sample_vacancies() {
        let record = store.create_vacancy(vacancy).await?;
        println!(
            "- Vacancy {}: {} ({}, {})",
            record.id, record.title, record.department, record.location
        );
        first_vacancy.get_or_insert(record);
    }

    if let Some(vacancy) = &first_vacancy {
        for (name, email) in SAMPLE_CANDIDATES {
            let record = store
                .create_application(NewApplication {
                    vacancy_id: vacancy.id,
                    candidate_name: name.to_string(),
                    candidate_email: email.to_string(),
                })
                .await?;
            println!(
                "- Application {} from {} for '{}'",
                record.id, record.candidate_name, vacancy.title
            );
        }
    }

    println!("\nSeeding leads");
    let intake = LeadIntakeService::new(
        Arc::new(SqliteLeadRepository::new(pool)),
        Arc::new(NotificationFanout::disabled()),
    );
    for index in 0..args.leads {
        let (name, email, company) = SAMPLE_LEADS[index as usize % SAMPLE_LEADS.len()];
        let form_type = FORM_ROTATION[index as usize % FORM_ROTATION.len()];
        let receipt = intake
            .submit(
                LeadSubmission {
                    name: name.to_string(),
                    email: email.to_string(),
                    company: Some(company.to_string()),
                    phone: None,
                    form_type,
                    message: None,
                },
                "seed".to_string(),
            )
            .await?;
        println!(
            "- Lead {}: {} <{}> ({})",
            receipt.id,
            name,
            email,
            form_type.as_str()
        );
    }

    println!("\nSeed complete");
    Ok(())
}

pub(crate) async fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    let store = SqliteCareersStore::new(pool);
    let snapshot = stats::collect(&store).await?;

    if args.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("snapshot unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Careers snapshot (generated {})", Local::now().date_naive());

    println!("\nVacancies: {} total", snapshot.vacancies.total);
    render_counts(
        "By department",
        snapshot
            .vacancies
            .by_department
            .iter()
            .map(|row| (row.department.as_str(), row.count)),
    );
    render_counts(
        "By location",
        snapshot
            .vacancies
            .by_location
            .iter()
            .map(|row| (row.location.as_str(), row.count)),
    );
    render_counts(
        "By type",
        snapshot
            .vacancies
            .by_type
            .iter()
            .map(|row| (row.kind.as_str(), row.count)),
    );
    render_counts(
        "By status",
        snapshot
            .vacancies
            .by_status
            .iter()
            .map(|row| (row.status.as_str(), row.count)),
    );

    println!("\nApplications: {} total", snapshot.applications.total);
    println!(
        "Today {} | past 7 days {} | past 30 days {}",
        snapshot.applications.today,
        snapshot.applications.this_week,
        snapshot.applications.this_month
    );
    render_counts(
        "By status",
        snapshot
            .applications
            .by_status
            .iter()
            .map(|row| (row.status.as_str(), row.count)),
    );

    Ok(())
}

fn render_counts<'a>(heading: &str, rows: impl Iterator<Item = (&'a str, i64)>) {
    let rows: Vec<(&str, i64)> = rows.collect();
    if rows.is_empty() {
        println!("{heading}: none yet");
        return;
    }

    println!("{heading}:");
    for (label, count) in rows {
        println!("  - {label}: {count}");
    }
}
