//! The status update workflow
//!
//! One invocation runs strictly in order: parse the project URL, check the
//! assignee gate, resolve the project id, resolve the item's Status field,
//! check the open-status gate, then mutate. Any error aborts the run; the
//! two gates end it successfully without touching the board.

use tracing::{debug, info};

use crate::board::{LinkedItem, ProjectBoard, ProjectId, StatusUpdate};
use crate::{Error, Inputs, ProjectReference, Result, TriggerEvent};

/// Why an item was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Somebody already owns the item
    Assigned {
        /// Logins of the current assignees
        assignees: Vec<String>,
    },
    /// The Status field holds something other than the open status
    NotOpen {
        /// The current Status value
        status: String,
    },
    /// The item has no Status value at all
    NoStatus,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The Status field was changed
    Updated {
        /// Status value reported by the board after the update
        field_name: String,
    },
    /// The item was not eligible
    Skipped {
        /// Issue or pull request number
        number: u64,
        reason: SkipReason,
    },
    /// The item was eligible but the mutation was suppressed
    DryRun {
        /// The update that would have been sent
        update: StatusUpdate,
    },
}

impl Outcome {
    /// The value to publish as the `fieldName` output, if any
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Outcome::Updated { field_name } => Some(field_name),
            _ => None,
        }
    }

    /// Check if the item was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }
}

/// Moves unassigned items from the open status to a new status
pub struct StatusUpdater<B> {
    board: B,
    dry_run: bool,
}

impl<B: ProjectBoard> StatusUpdater<B> {
    /// Create an updater backed by the given board
    pub fn new(board: B) -> Self {
        Self {
            board,
            dry_run: false,
        }
    }

    /// Resolve everything but skip the final mutation
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Access the underlying board
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Run the workflow for one triggering event
    pub async fn run(&self, inputs: &Inputs, event: &TriggerEvent) -> Result<Outcome> {
        let number = event.number;
        let project = ProjectReference::parse(&inputs.project_url)?;
        debug!(%project, number, owner = %event.repository_owner_login, "Parsed project URL");

        if event.is_assigned() {
            info!(number, assignees = ?event.assignees, "Skipping #{}: already assigned", number);
            return Ok(Outcome::Skipped {
                number,
                reason: SkipReason::Assigned {
                    assignees: event.assignees.clone(),
                },
            });
        }

        let project_id = self
            .board
            .project_id(&project)
            .await
            .map_err(|e| Error::RemoteQuery {
                context: format!("project id for {}", project),
                message: e.to_string(),
            })?;
        debug!(%project_id, "Resolved project id");

        let items = self
            .board
            .linked_items(&event.node_id)
            .await
            .map_err(|e| Error::RemoteQuery {
                context: format!("Status field of #{}", number),
                message: e.to_string(),
            })?;

        let item = select_item(items, &project_id).ok_or(Error::MissingProjectItem(number))?;

        let Some(status) = item.status else {
            info!(number, item_id = %item.item_id, "Skipping #{}: no status set", number);
            return Ok(Outcome::Skipped {
                number,
                reason: SkipReason::NoStatus,
            });
        };

        if status.status_name != inputs.open_status {
            info!(
                number,
                status = %status.status_name,
                open_status = %inputs.open_status,
                "Skipping #{}: status is not '{}'",
                number,
                inputs.open_status
            );
            return Ok(Outcome::Skipped {
                number,
                reason: SkipReason::NotOpen {
                    status: status.status_name,
                },
            });
        }

        let option_id = status
            .option_id(&inputs.new_status)
            .ok_or_else(|| Error::RemoteMutation {
                context: format!("Status of #{}", number),
                message: format!(
                    "'{}' is not an option of the Status field (available: {})",
                    inputs.new_status,
                    status.option_names()
                ),
            })?
            .to_string();

        let update = StatusUpdate {
            project_id,
            item_id: item.item_id,
            field_id: status.field_id,
            option_id,
            value: inputs.new_status.clone(),
        };

        if self.dry_run {
            info!(
                number,
                from = %status.status_name,
                to = %update.value,
                "Dry run: would update #{}",
                number
            );
            return Ok(Outcome::DryRun { update });
        }

        let field_name = self
            .board
            .update_status(&update)
            .await
            .map_err(|e| Error::RemoteMutation {
                context: format!("Status of #{}", number),
                message: e.to_string(),
            })?;

        info!(
            number,
            from = %status.status_name,
            to = %field_name,
            "Updated status of #{}",
            number
        );

        Ok(Outcome::Updated { field_name })
    }
}

/// The linked item that lives on the resolved board
///
/// Items on other boards carry another board's Status and cannot be
/// mutated under this project id.
fn select_item(items: Vec<LinkedItem>, project_id: &ProjectId) -> Option<LinkedItem> {
    items
        .into_iter()
        .find(|item| &item.project_id == project_id)
}
