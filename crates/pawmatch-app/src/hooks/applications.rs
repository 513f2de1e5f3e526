// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pawmatch_core::types::{Application, ApplicationStatus};
use pawmatch_services::{ApplicationFilter, ApplicationForm, ApplicationService};
use tokio::sync::{watch, Mutex};

use crate::resource::{MutationOutcome, Resource, ResourceCell};

/// Applications, optionally limited to one applicant email.
pub struct ApplicationsHook {
    service: ApplicationService,
    user_email: Mutex<Option<String>>,
    cell: ResourceCell<Vec<Application>>,
}

impl ApplicationsHook {
    pub fn new(service: ApplicationService, user_email: Option<String>) -> Self {
        Self {
            service,
            user_email: Mutex::new(user_email),
            cell: ResourceCell::new("applications", Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<Application>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> Resource<Vec<Application>> {
        self.cell.snapshot()
    }

    pub async fn mount(&self) {
        self.refetch().await;
    }

    pub async fn refetch(&self) {
        let filter = ApplicationFilter {
            user_email: self.user_email.lock().await.clone(),
            status: None,
        };
        self.cell
            .load(self.service.get_all_applications(Some(&filter)))
            .await;
    }

    pub async fn set_user_email(&self, user_email: Option<String>) {
        {
            let mut current = self.user_email.lock().await;
            if *current == user_email {
                return;
            }
            *current = user_email;
        }
        self.refetch().await;
    }

    /// Submits a form; the new application is prepended on success.
    pub async fn create(&self, form: ApplicationForm) -> MutationOutcome<Application> {
        let result = self.service.create_application(form).await;
        if let Ok(app) = &result {
            let app = app.clone();
            self.cell.update(|list| list.insert(0, app));
        }
        result.into()
    }

    /// Changes one application's status and replaces it in the list.
    pub async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> MutationOutcome<Application> {
        let result = self.service.update_application_status(id, status).await;
        if let Ok(app) = &result {
            let app = app.clone();
            self.cell.update(|list| {
                if let Some(slot) = list.iter_mut().find(|a| a.id() == app.id()) {
                    *slot = app;
                }
            });
        }
        result.into()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}

/// One application by id.
pub struct ApplicationHook {
    service: ApplicationService,
    id: Mutex<String>,
    cell: ResourceCell<Option<Application>>,
}

impl ApplicationHook {
    pub fn new(service: ApplicationService, id: impl Into<String>) -> Self {
        Self {
            service,
            id: Mutex::new(id.into()),
            cell: ResourceCell::new("application", None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Option<Application>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> Resource<Option<Application>> {
        self.cell.snapshot()
    }

    pub async fn mount(&self) {
        self.refetch().await;
    }

    pub async fn refetch(&self) {
        let id = self.id.lock().await.clone();
        if id.trim().is_empty() {
            return;
        }
        self.cell
            .load(async { self.service.get_application_by_id(&id).await.map(Some) })
            .await;
    }

    pub async fn set_id(&self, id: impl Into<String>) {
        let id = id.into();
        {
            let mut current = self.id.lock().await;
            if *current == id {
                return;
            }
            *current = id;
        }
        self.cell.reset(None);
        self.refetch().await;
    }

    pub async fn update_status(&self, status: ApplicationStatus) -> MutationOutcome<Application> {
        let id = self.id.lock().await.clone();
        let result = self.service.update_application_status(&id, status).await;
        if let Ok(app) = &result {
            let app = app.clone();
            self.cell.update(|slot| *slot = Some(app));
        }
        result.into()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
