//! In-memory identity provider for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::provider::{Account, IdentityProvider, ProviderError, TokenResult};

/// What the mock's silent acquisition should do.
#[derive(Debug, Clone)]
pub enum SilentBehavior {
    /// Succeed with the given access token.
    Token(String),
    /// Signal that user interaction is required.
    InteractionRequired,
    /// Signal that an interactive flow is already under way.
    InProgress,
    /// Fail with an unrelated provider error.
    Fail(String),
}

/// Scriptable [`IdentityProvider`] recording every SDK interaction.
///
/// The interaction-in-progress flag is toggled atomically by the
/// redirect entry points, mirroring the real SDK's refusal to start a
/// second interactive flow.
pub struct MockProvider {
    active: Mutex<Option<Account>>,
    accounts: Mutex<Vec<Account>>,
    redirect_account: Mutex<Option<Account>>,
    silent: Mutex<SilentBehavior>,
    init_failure: Option<String>,
    interaction: AtomicBool,
    init_calls: AtomicUsize,
    redirect_handling_passes: AtomicUsize,
    login_redirects: AtomicUsize,
    token_redirects: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            accounts: Mutex::new(Vec::new()),
            redirect_account: Mutex::new(None),
            silent: Mutex::new(SilentBehavior::InteractionRequired),
            init_failure: None,
            interaction: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
            redirect_handling_passes: AtomicUsize::new(0),
            login_redirects: AtomicUsize::new(0),
            token_redirects: AtomicUsize::new(0),
        }
    }

    pub fn with_account(self, account: Account) -> Self {
        *self.active.lock().unwrap() = Some(account.clone());
        self.accounts.lock().unwrap().push(account);
        self
    }

    pub fn with_known_accounts(self, accounts: Vec<Account>) -> Self {
        *self.accounts.lock().unwrap() = accounts;
        self
    }

    pub fn with_redirect_account(self, account: Account) -> Self {
        *self.redirect_account.lock().unwrap() = Some(account);
        self
    }

    pub fn with_silent_behavior(self, behavior: SilentBehavior) -> Self {
        *self.silent.lock().unwrap() = behavior;
        self
    }

    pub fn with_interaction_in_progress(self) -> Self {
        self.interaction.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_init_failure(mut self, message: &str) -> Self {
        self.init_failure = Some(message.to_string());
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn redirect_handling_passes(&self) -> usize {
        self.redirect_handling_passes.load(Ordering::SeqCst)
    }

    pub fn login_redirects(&self) -> usize {
        self.login_redirects.load(Ordering::SeqCst)
    }

    pub fn token_redirects(&self) -> usize {
        self.token_redirects.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> Option<Account> {
        self.active.lock().unwrap().clone()
    }

    fn begin_interaction(&self) -> Result<(), ProviderError> {
        if self.interaction.swap(true, Ordering::SeqCst) {
            return Err(ProviderError::InteractionInProgress);
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn initialize(&self) -> Result<(), ProviderError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        match &self.init_failure {
            Some(message) => Err(ProviderError::other(message.clone())),
            None => Ok(()),
        }
    }

    async fn handle_redirect_response(&self) -> Result<Option<Account>, ProviderError> {
        self.redirect_handling_passes.fetch_add(1, Ordering::SeqCst);
        Ok(self.redirect_account.lock().unwrap().take())
    }

    fn active_account(&self) -> Option<Account> {
        self.active.lock().unwrap().clone()
    }

    fn set_active_account(&self, account: &Account) {
        *self.active.lock().unwrap() = Some(account.clone());
        let mut accounts = self.accounts.lock().unwrap();
        if !accounts.contains(account) {
            accounts.push(account.clone());
        }
    }

    fn all_accounts(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }

    fn is_interaction_in_progress(&self) -> bool {
        self.interaction.load(Ordering::SeqCst)
    }

    async fn login_redirect(&self, _scopes: &[String]) -> Result<(), ProviderError> {
        self.begin_interaction()?;
        self.login_redirects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn acquire_token_silent(
        &self,
        scopes: &[String],
        _account: &Account,
    ) -> Result<TokenResult, ProviderError> {
        let behavior = self.silent.lock().unwrap().clone();
        match behavior {
            SilentBehavior::Token(access_token) => Ok(TokenResult {
                access_token,
                expires_on: OffsetDateTime::now_utc() + time::Duration::hours(1),
                scopes: scopes.to_vec(),
            }),
            SilentBehavior::InteractionRequired => {
                Err(ProviderError::interaction_required("login_required"))
            }
            SilentBehavior::InProgress => Err(ProviderError::InteractionInProgress),
            SilentBehavior::Fail(message) => Err(ProviderError::other(message)),
        }
    }

    async fn acquire_token_redirect(
        &self,
        _scopes: &[String],
        _account: &Account,
    ) -> Result<(), ProviderError> {
        self.begin_interaction()?;
        self.token_redirects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn logout_redirect(&self) -> Result<(), ProviderError> {
        self.begin_interaction()?;
        *self.active.lock().unwrap() = None;
        Ok(())
    }
}
