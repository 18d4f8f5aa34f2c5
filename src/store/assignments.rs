use super::repository::{AssignmentRepository, ProjectRepository};
use super::types::{Assignment, ProjectRevenue, Store};
use crate::error::{EngineError, EngineResult};
use crate::revenue::validate_assignment;

impl Store {
    /// Return an assignment id not yet used in this store ("assignment-N").
    pub fn next_assignment_id(&self) -> String {
        let mut n = self.assignments.len() + 1;
        loop {
            let candidate = format!("assignment-{}", n);
            if self.assignment(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Add a new assignment after validating its terms.
    pub fn create_assignment(&mut self, assignment: Assignment) -> EngineResult<&Assignment> {
        self.check_assignment(&assignment)?;
        if self.assignment(&assignment.id).is_some() {
            return Err(EngineError::invalid(format!(
                "assignment id '{}' already exists",
                assignment.id
            )));
        }

        tracing::info!(
            assignment = %assignment.id,
            project = %assignment.project_id,
            associate = %assignment.associate_id,
            "assignment created"
        );
        self.assignments.push(assignment);
        // Just pushed, so the vector is non-empty
        Ok(&self.assignments[self.assignments.len() - 1])
    }

    /// Replace an existing assignment, matched by id.
    pub fn update_assignment(&mut self, assignment: Assignment) -> EngineResult<&Assignment> {
        self.check_assignment(&assignment)?;
        let index = self
            .assignments
            .iter()
            .position(|a| a.id == assignment.id)
            .ok_or_else(|| EngineError::not_found("assignment", assignment.id.clone()))?;

        tracing::info!(assignment = %assignment.id, "assignment updated");
        self.assignments[index] = assignment;
        Ok(&self.assignments[index])
    }

    /// Remove an assignment and hand it back.
    pub fn delete_assignment(&mut self, id: &str) -> EngineResult<Assignment> {
        let index = self
            .assignments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| EngineError::not_found("assignment", id))?;

        tracing::info!(assignment = %id, "assignment deleted");
        Ok(self.assignments.remove(index))
    }

    /// Insert or replace the single revenue record of a project.
    pub fn set_project_revenue(&mut self, record: ProjectRevenue) -> EngineResult<&ProjectRevenue> {
        if self.project(&record.project_id).is_none() {
            return Err(EngineError::not_found("project", record.project_id.clone()));
        }
        if !record.revenue.is_finite() || record.revenue < 0.0 {
            return Err(EngineError::invalid(format!(
                "revenue must be a non-negative amount, got {}",
                record.revenue
            )));
        }
        if record.end_date < record.start_date {
            return Err(EngineError::invalid(format!(
                "revenue window ends ({}) before it starts ({})",
                record.end_date, record.start_date
            )));
        }

        let index = match self
            .project_revenues
            .iter()
            .position(|r| r.project_id == record.project_id)
        {
            Some(i) => {
                self.project_revenues[i] = record;
                i
            }
            None => {
                self.project_revenues.push(record);
                self.project_revenues.len() - 1
            }
        };
        Ok(&self.project_revenues[index])
    }

    fn check_assignment(&self, assignment: &Assignment) -> EngineResult<()> {
        validate_assignment(assignment)?;
        if assignment.end_date < assignment.start_date {
            return Err(EngineError::invalid(format!(
                "assignment '{}' ends ({}) before it starts ({})",
                assignment.id, assignment.end_date, assignment.start_date
            )));
        }
        if self.project(&assignment.project_id).is_none() {
            return Err(EngineError::not_found(
                "project",
                assignment.project_id.clone(),
            ));
        }
        Ok(())
    }
}
