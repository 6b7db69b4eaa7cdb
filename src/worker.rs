use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::client::{ClientError, PortalClient};
use crate::domain::RecordRef;
use crate::kinds::KindId;
use crate::listing::{FetchError, RequestDescriptor, RequestToken};

#[derive(Debug)]
pub enum PortalRequest {
    FetchPage {
        kind: KindId,
        token: RequestToken,
        descriptor: RequestDescriptor,
    },
    LoadWorkgroups,
    DeleteRecord(RecordRef),
}

#[derive(Clone)]
pub struct PortalHandle {
    tx: mpsc::UnboundedSender<PortalRequest>,
}

impl PortalHandle {
    pub fn send(&self, request: PortalRequest) {
        let _ = self.tx.send(request);
    }
}

/// Executes backend requests off the UI loop and reports back as actions.
pub struct PortalWorker {
    client: Arc<dyn PortalClient>,
    rx: mpsc::UnboundedReceiver<PortalRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl PortalWorker {
    pub fn new(
        client: Arc<dyn PortalClient>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, PortalHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = PortalHandle { tx };
        let worker = Self {
            client,
            rx,
            action_tx,
        };
        (worker, handle)
    }

    /// Requests run concurrently, so results may arrive out of order.
    /// Request tokens sort that out in the app.
    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let client = Arc::clone(&self.client);
            let action_tx = self.action_tx.clone();
            tokio::spawn(async move {
                for action in process(client.as_ref(), request).await {
                    if action_tx.send(action).is_err() {
                        break;
                    }
                }
            });
        }
    }
}

async fn process(client: &dyn PortalClient, request: PortalRequest) -> Vec<Action> {
    match request {
        PortalRequest::FetchPage {
            kind,
            token,
            descriptor,
        } => {
            let result = client.fetch_page(kind, &descriptor).await;
            if let Err(ref e) = result {
                tracing::warn!(?kind, %token, request = %descriptor, error = %e, "page fetch failed");
            }
            let expired = matches!(result, Err(ClientError::Unauthorized { .. }));
            let mut actions = vec![Action::PageLoaded {
                kind,
                token,
                result: result.map_err(FetchError::from),
            }];
            if expired {
                actions.push(Action::SessionExpired);
            }
            actions
        }
        PortalRequest::LoadWorkgroups => match client.list_workgroups().await {
            Ok(workgroups) => vec![Action::WorkgroupsLoaded(workgroups)],
            Err(ClientError::Unauthorized { .. }) => vec![Action::SessionExpired],
            Err(e) => {
                tracing::warn!(error = %e, "workgroup list failed");
                vec![Action::WorkgroupsFailed(e.user_message())]
            }
        },
        PortalRequest::DeleteRecord(target) => match client.delete_record(&target).await {
            Ok(()) => vec![Action::RecordDeleted(target)],
            Err(ClientError::Unauthorized { .. }) => vec![Action::SessionExpired],
            Err(e) => vec![Action::Error(format!(
                "failed to delete {:?}: {}",
                target.title,
                e.user_message()
            ))],
        },
    }
}
