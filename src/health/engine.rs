use chrono::{DateTime, Utc};

use super::config::HealthConfig;
use super::factors::{
    document_approval_factor, financial_health_factor, milestone_progress_factor,
    project_health_factor, task_completion_factor, weighted_score,
};
use super::state::{HealthScore, HealthTrend};
use crate::error::{EngineError, EngineResult};
use crate::store::{
    Client, ClientRepository, DocumentRepository, MilestoneRepository, ProjectRepository,
    TaskRepository,
};

/// Everything the health engine reads from.
pub trait HealthSource:
    ClientRepository + ProjectRepository + TaskRepository + MilestoneRepository + DocumentRepository
{
}

impl<T: ?Sized> HealthSource for T where
    T: ClientRepository + ProjectRepository + TaskRepository + MilestoneRepository + DocumentRepository
{
}

/// Read-only health scoring over an injected store.
pub struct HealthEngine<'a, S: ?Sized> {
    store: &'a S,
    config: &'a HealthConfig,
}

impl<'a, S: HealthSource + ?Sized> HealthEngine<'a, S> {
    pub fn new(store: &'a S, config: &'a HealthConfig) -> Self {
        Self { store, config }
    }

    fn client(&self, client_id: &str) -> EngineResult<&'a Client> {
        self.store
            .client(client_id)
            .ok_or_else(|| EngineError::not_found("client", client_id))
    }

    /// Five-factor health score for a client, computed from live data.
    pub fn calculate_client_health_score(&self, client_id: &str) -> EngineResult<HealthScore> {
        let client = self.client(client_id)?;
        let weights = &self.config.weights;
        let projects = self.store.projects_for_client(client_id);

        let mut tasks = Vec::new();
        let mut milestones = Vec::new();
        let mut documents = Vec::new();
        for project in &projects {
            tasks.extend(self.store.tasks_for_project(&project.id));
            milestones.extend(self.store.milestones_for_project(&project.id));
            documents.extend(self.store.documents_for_project(&project.id));
        }

        let factors = vec![
            project_health_factor(
                &projects,
                &self.config.project_scores,
                weights.project_health,
            ),
            task_completion_factor(&tasks, weights.task_completion),
            milestone_progress_factor(&milestones, weights.milestone_progress),
            financial_health_factor(
                client.total_revenue,
                client.outstanding_balance,
                weights.financial_health,
            ),
            document_approval_factor(&documents, weights.document_approval),
        ];
        let score = weighted_score(&factors);

        tracing::debug!(
            client = %client_id,
            score,
            projects = projects.len(),
            tasks = tasks.len(),
            milestones = milestones.len(),
            documents = documents.len(),
            "client health calculated"
        );
        Ok(HealthScore { score, factors })
    }

    /// Override if set, else the calculated score.
    pub fn effective_score(&self, client_id: &str) -> EngineResult<u8> {
        let client = self.client(client_id)?;
        match client.health.override_score {
            Some(score) => Ok(score),
            None => Ok(self.calculate_client_health_score(client_id)?.score),
        }
    }

    /// Direction of the client's recorded health history.
    pub fn client_health_trend(&self, client_id: &str) -> EngineResult<HealthTrend> {
        let client = self.client(client_id)?;
        Ok(client
            .health
            .trend(self.config.trend_window, self.config.trend_threshold))
    }
}

/// Set or clear a client's manual override, logging one history entry.
pub fn update_client_health_override<S: HealthSource + ?Sized>(
    store: &mut S,
    config: &HealthConfig,
    client_id: &str,
    value: Option<i64>,
    note: Option<String>,
    acting_user: &str,
) -> EngineResult<Client> {
    update_client_health_override_at(store, config, client_id, value, note, acting_user, Utc::now())
}

/// [`update_client_health_override`] with an explicit timestamp.
pub fn update_client_health_override_at<S: HealthSource + ?Sized>(
    store: &mut S,
    config: &HealthConfig,
    client_id: &str,
    value: Option<i64>,
    note: Option<String>,
    acting_user: &str,
    at: DateTime<Utc>,
) -> EngineResult<Client> {
    let calculated = HealthEngine::new(&*store, config).calculate_client_health_score(client_id)?;
    let client = store
        .client_mut(client_id)
        .ok_or_else(|| EngineError::not_found("client", client_id))?;

    client.health.apply_override(
        value,
        &calculated,
        note,
        Some(acting_user.to_string()),
        at,
    )?;

    match value {
        Some(v) => tracing::info!(client = %client_id, score = v, user = %acting_user, "health override set"),
        None => tracing::info!(client = %client_id, user = %acting_user, "health override cleared"),
    }
    Ok(client.clone())
}

/// Result of [`refresh_client_health`].
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRefresh {
    pub client: Client,
    pub calculated: HealthScore,
    /// Whether the stored snapshot differed and was replaced
    pub changed: bool,
}

/// Store the current calculation as the client's factor snapshot.
pub fn refresh_client_health<S: HealthSource + ?Sized>(
    store: &mut S,
    config: &HealthConfig,
    client_id: &str,
) -> EngineResult<HealthRefresh> {
    let calculated = HealthEngine::new(&*store, config).calculate_client_health_score(client_id)?;
    let client = store
        .client_mut(client_id)
        .ok_or_else(|| EngineError::not_found("client", client_id))?;
    let changed = client.health.record_snapshot(&calculated);
    if changed {
        tracing::debug!(client = %client_id, score = calculated.score, "health snapshot updated");
    }
    Ok(HealthRefresh {
        client: client.clone(),
        calculated,
        changed,
    })
}

/// Replace the client's health notes.
pub fn add_client_health_note<S: ClientRepository + ?Sized>(
    store: &mut S,
    client_id: &str,
    text: &str,
) -> EngineResult<Client> {
    let client = client_mut(store, client_id)?;
    client.health.set_notes(text);
    tracing::info!(client = %client_id, "health notes updated");
    Ok(client.clone())
}

/// Append an alert to the client.
pub fn add_client_health_alert<S: ClientRepository + ?Sized>(
    store: &mut S,
    client_id: &str,
    text: &str,
) -> EngineResult<Client> {
    let client = client_mut(store, client_id)?;
    client.health.add_alert(text);
    tracing::info!(client = %client_id, alert = %text, "health alert added");
    Ok(client.clone())
}

/// Remove every alert matching `text`. Removing an absent alert is not an error.
pub fn remove_client_health_alert<S: ClientRepository + ?Sized>(
    store: &mut S,
    client_id: &str,
    text: &str,
) -> EngineResult<Client> {
    let client = client_mut(store, client_id)?;
    let removed = client.health.remove_alert(text);
    if removed == 0 {
        tracing::warn!(client = %client_id, alert = %text, "no matching alert to remove");
    } else {
        tracing::info!(client = %client_id, alert = %text, removed, "health alert removed");
    }
    Ok(client.clone())
}

fn client_mut<'s, S: ClientRepository + ?Sized>(
    store: &'s mut S,
    client_id: &str,
) -> EngineResult<&'s mut Client> {
    store
        .client_mut(client_id)
        .ok_or_else(|| EngineError::not_found("client", client_id))
}
