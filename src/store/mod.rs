pub mod assignments;
pub mod repository;
pub mod storage;
pub mod types;

pub use repository::{
    AssignmentRepository, AssociateRepository, ClientRepository, DocumentRepository,
    MilestoneRepository, ProjectRepository, RevenueRepository, TaskRepository,
};
pub use storage::{get_store_path, load_store, save_store};
pub use types::{
    Assignment, Associate, Client, Document, DocumentStatus, Milestone, Project, ProjectHealth,
    ProjectRevenue, ProjectStage, RevenueStatus, Store, Task, TaskStatus, STORE_VERSION,
};
