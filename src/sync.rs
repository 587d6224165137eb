use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::api::LeagueApi;
use crate::state::{Delta, ProviderCommand};

/// Runs the sync worker: one refresh at startup, then one command at a time
/// until either side of the channel pair goes away.
pub fn spawn_provider(
    api: Arc<dyn LeagueApi>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if tx.send(refresh(api.as_ref())).is_err() {
            return;
        }

        for cmd in cmd_rx {
            for delta in handle_command(api.as_ref(), cmd) {
                if tx.send(delta).is_err() {
                    return;
                }
            }
        }
    })
}

/// Fetches teams and stats side by side. Both land together or not at all.
pub fn refresh(api: &dyn LeagueApi) -> Delta {
    let (teams, stats) = rayon::join(|| api.list_teams(), || api.get_stats());
    match (teams, stats) {
        (Ok(teams), Ok(stats)) => {
            info!(teams = teams.len(), "refresh loaded");
            Delta::RefreshLoaded { teams, stats }
        }
        (Err(err), _) | (_, Err(err)) => {
            warn!(error = %err, "refresh failed");
            Delta::RefreshFailed(err)
        }
    }
}

pub fn handle_command(api: &dyn LeagueApi, cmd: ProviderCommand) -> Vec<Delta> {
    match cmd {
        ProviderCommand::Refresh => vec![refresh(api)],
        ProviderCommand::Authenticate { password } => match api.authenticate(&password) {
            Ok(credential) => {
                info!("admin login accepted");
                vec![Delta::LoginSucceeded(credential)]
            }
            Err(err) => {
                warn!(error = %err, "admin login rejected");
                vec![Delta::LoginFailed(err)]
            }
        },
        ProviderCommand::UpdateTeam {
            id,
            patch,
            credential,
        } => match api.update_team(&id, &patch, &credential) {
            Ok(()) => {
                info!(team = %id, "team updated");
                vec![Delta::TeamSaved { id }, refresh(api)]
            }
            Err(error) => {
                warn!(team = %id, %error, "team update failed");
                vec![Delta::TeamSaveFailed { id, error }]
            }
        },
        ProviderCommand::DeleteTeam { id, credential } => {
            match api.delete_team(&id, &credential) {
                Ok(()) => {
                    info!(team = %id, "team deleted");
                    vec![Delta::TeamDeleted { id }, refresh(api)]
                }
                Err(error) => {
                    warn!(team = %id, %error, "team delete failed");
                    vec![Delta::TeamDeleteFailed { id, error }]
                }
            }
        }
    }
}
