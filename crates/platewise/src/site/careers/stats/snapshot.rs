use super::views::{
    ApplicationStatsView, CareersStatsView, DepartmentCount, LocationCount, StatusCount, TypeCount,
    VacancyStatsView,
};
use crate::site::careers::store::{ActivityWindow, CareersStore, VacancyDimension};
use crate::site::db::StoreError;

/// Build the dashboard snapshot from ten reads issued one at a time in
/// a fixed order. The first failure abandons the whole snapshot; the
/// caller never sees partial counts.
pub async fn collect<S>(store: &S) -> Result<CareersStatsView, StoreError>
where
    S: CareersStore + ?Sized,
{
    let vacancy_total = store.vacancy_total().await?;
    let by_department = store.vacancies_by(VacancyDimension::Department).await?;
    let by_location = store.vacancies_by(VacancyDimension::Location).await?;
    let by_type = store.vacancies_by(VacancyDimension::EmploymentType).await?;
    let by_status = store.vacancies_by(VacancyDimension::Status).await?;

    let application_total = store.application_total().await?;
    let today = store.applications_in(ActivityWindow::Today).await?;
    let this_week = store.applications_in(ActivityWindow::PastWeek).await?;
    let this_month = store.applications_in(ActivityWindow::PastMonth).await?;
    let application_statuses = store.applications_by_status().await?;

    Ok(CareersStatsView {
        vacancies: VacancyStatsView {
            total: vacancy_total,
            by_department: by_department
                .into_iter()
                .map(|(department, count)| DepartmentCount { department, count })
                .collect(),
            by_location: by_location
                .into_iter()
                .map(|(location, count)| LocationCount { location, count })
                .collect(),
            by_type: by_type
                .into_iter()
                .map(|(kind, count)| TypeCount { kind, count })
                .collect(),
            by_status: by_status
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
        },
        applications: ApplicationStatsView {
            total: application_total,
            today,
            this_week,
            this_month,
            by_status: application_statuses
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
        },
    })
}
