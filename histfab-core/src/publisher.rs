use crate::credentials::remote_callbacks;
use crate::error::{Error, Result};
use git2::{PushOptions, Repository};
use tracing::{info, warn};

/// Refspec pushing the current head to `branch`, or to the branch of the same
/// name when none is configured.
pub fn push_refspec(repo: &Repository, branch: Option<&str>) -> Result<String> {
    if let Some(branch) = branch {
        return Ok(format!("HEAD:refs/heads/{}", branch));
    }

    let head = repo.head()?;
    if !head.is_branch() {
        return Err(Error::DetachedHead);
    }
    let name = head
        .name()
        .ok_or_else(|| Error::InvalidPath("branch name is not valid UTF-8".to_string()))?;
    Ok(format!("{}:{}", name, name))
}

/// Pushes the current head to `remote_name`. Returns the refspec used.
///
/// Rejections reported by the remote for the updated reference become
/// [`Error::PushRejected`].
pub fn publish(repo: &Repository, remote_name: &str, branch: Option<&str>) -> Result<String> {
    let mut remote = repo.find_remote(remote_name).map_err(|e| {
        if e.code() == git2::ErrorCode::NotFound {
            Error::RemoteNotFound(remote_name.to_string())
        } else {
            Error::Git(e)
        }
    })?;
    let refspec = push_refspec(repo, branch)?;

    info!("Pushing {} to {}", refspec, remote_name);

    let mut rejection: Option<(String, String)> = None;
    {
        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|reference, status| {
            if let Some(message) = status {
                warn!(reference, reason = message, "remote rejected reference");
                rejection = Some((reference.to_string(), message.to_string()));
            }
            Ok(())
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);
        remote.push(&[refspec.as_str()], Some(&mut options))?;
    }

    if let Some((reference, message)) = rejection {
        return Err(Error::PushRejected { reference, message });
    }

    Ok(refspec)
}
