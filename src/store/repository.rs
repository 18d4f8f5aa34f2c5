//! Lookup seams between the engines and whatever holds the collections.
//!
//! `Store` implements every trait; tests and embedding hosts can supply their
//! own implementations.

use super::types::{
    Assignment, Associate, Client, Document, Milestone, Project, ProjectRevenue, Store, Task,
};

pub trait ClientRepository {
    fn client(&self, id: &str) -> Option<&Client>;
    fn client_mut(&mut self, id: &str) -> Option<&mut Client>;
}

pub trait ProjectRepository {
    fn project(&self, id: &str) -> Option<&Project>;
    fn projects_for_client(&self, client_id: &str) -> Vec<&Project>;
}

pub trait TaskRepository {
    fn tasks_for_project(&self, project_id: &str) -> Vec<&Task>;
}

pub trait MilestoneRepository {
    fn milestones_for_project(&self, project_id: &str) -> Vec<&Milestone>;
}

pub trait DocumentRepository {
    fn documents_for_project(&self, project_id: &str) -> Vec<&Document>;
}

pub trait AssociateRepository {
    fn associate(&self, id: &str) -> Option<&Associate>;
}

pub trait AssignmentRepository {
    fn assignment(&self, id: &str) -> Option<&Assignment>;
    fn assignments_for_project(&self, project_id: &str) -> Vec<&Assignment>;
}

pub trait RevenueRepository {
    fn project_revenue(&self, project_id: &str) -> Option<&ProjectRevenue>;
}

impl ClientRepository for Store {
    fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    fn client_mut(&mut self, id: &str) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }
}

impl ProjectRepository for Store {
    fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn projects_for_client(&self, client_id: &str) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.client == client_id).collect()
    }
}

impl TaskRepository for Store {
    fn tasks_for_project(&self, project_id: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.project_id == project_id).collect()
    }
}

impl MilestoneRepository for Store {
    fn milestones_for_project(&self, project_id: &str) -> Vec<&Milestone> {
        self.milestones
            .iter()
            .filter(|m| m.project_id == project_id)
            .collect()
    }
}

impl DocumentRepository for Store {
    fn documents_for_project(&self, project_id: &str) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| d.project_id == project_id)
            .collect()
    }
}

impl AssociateRepository for Store {
    fn associate(&self, id: &str) -> Option<&Associate> {
        self.associates.iter().find(|a| a.id == id)
    }
}

impl AssignmentRepository for Store {
    fn assignment(&self, id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    fn assignments_for_project(&self, project_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.project_id == project_id)
            .collect()
    }
}

impl RevenueRepository for Store {
    fn project_revenue(&self, project_id: &str) -> Option<&ProjectRevenue> {
        self.project_revenues
            .iter()
            .find(|r| r.project_id == project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{ProjectHealth, ProjectStage, TaskStatus};

    fn project(id: &str, client: &str) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_uppercase(),
            client: client.to_string(),
            health: ProjectHealth::OnTrack,
            stage: ProjectStage::Execution,
            assigned_associates: vec![],
        }
    }

    #[test]
    fn test_projects_for_client_filters() {
        let mut store = Store::new();
        store.projects.push(project("p1", "c1"));
        store.projects.push(project("p2", "c2"));
        store.projects.push(project("p3", "c1"));

        let ids: Vec<_> = store
            .projects_for_client("c1")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_tasks_for_project_filters() {
        let mut store = Store::new();
        store.tasks.push(Task {
            id: "t1".to_string(),
            project_id: "p1".to_string(),
            title: String::new(),
            status: TaskStatus::Done,
        });
        store.tasks.push(Task {
            id: "t2".to_string(),
            project_id: "p2".to_string(),
            title: String::new(),
            status: TaskStatus::Todo,
        });

        assert_eq!(store.tasks_for_project("p1").len(), 1);
        assert!(store.tasks_for_project("missing").is_empty());
    }

    #[test]
    fn test_missing_lookups_return_none() {
        let store = Store::new();
        assert!(store.client("c1").is_none());
        assert!(store.associate("a1").is_none());
        assert!(store.project_revenue("p1").is_none());
    }
}
