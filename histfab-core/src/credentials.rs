use git2::{Cred, CredentialType, RemoteCallbacks};
use tracing::debug;

/// Environment variable holding an HTTPS access token.
pub const TOKEN_ENV: &str = "HISTFAB_TOKEN";

const MAX_ATTEMPTS: u32 = 3;

/// Callbacks supplying credentials for clone and push.
///
/// SSH remotes use the ssh-agent. HTTPS remotes use `HISTFAB_TOKEN` when set
/// and otherwise the configured git credential helper.
pub fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;

    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_ATTEMPTS {
            return Err(git2::Error::from_str(&format!(
                "authentication to {} failed after {} attempts",
                url, MAX_ATTEMPTS
            )));
        }
        debug!(url, attempt = attempts, ?allowed, "credentials requested");

        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(token) = std::env::var(TOKEN_ENV) {
                return Cred::userpass_plaintext(
                    username_from_url.unwrap_or("x-access-token"),
                    &token,
                );
            }
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username_from_url);
        }

        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username_from_url.unwrap_or("git"));
        }

        Cred::default()
    });

    callbacks
}
