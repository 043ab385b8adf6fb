//! The purchase pipeline.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use arcana_chain::{ChainRpc, ChainRpcError};
use arcana_ledger::CreditLedger;
use arcana_store::CreditStore;
use arcana_types::{AccountId, CreditPack, EntrySource, TxSignature, WalletAddress};
use arcana_verification::VerifyAndGrantRequest;

use crate::signing::normalize_signature;
use crate::tx::TransferDraft;
use crate::verify_client::VerifyClient;
use crate::wallet::{WalletAuthorization, WalletFailure, WalletFailureKind, WalletSession};
use crate::PaymentError;

/// How often a pending transaction is probed for confirmation.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How many probes before the pipeline stops waiting. The transfer itself
/// cannot be recalled once broadcast — giving up only stops the waiting.
const CONFIRM_MAX_PROBES: u32 = 30;

/// Where one purchase attempt currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentPhase {
    Idle,
    WalletAuthorizing,
    TxBuild,
    TxSigningSending,
    TxConfirming,
    Success,
    Failed,
}

/// A completed purchase.
#[derive(Clone, Debug)]
pub struct PaymentReceipt {
    pub signature: TxSignature,
    pub credits: u32,
    pub new_balance: i64,
}

/// Drives a credit-pack purchase end to end.
///
/// There is no automatic retry across the pipeline: a failed attempt lands
/// in [`PaymentPhase::Failed`] and the caller starts over with a fresh
/// [`purchase`](PaymentPipeline::purchase) call.
pub struct PaymentPipeline<W, C, S> {
    wallet: W,
    chain: C,
    ledger: Arc<CreditLedger<S>>,
    treasury: WalletAddress,
    verify_client: Option<VerifyClient>,
    session_token: StdMutex<Option<String>>,
    phase: StdMutex<PaymentPhase>,
}

impl<W, C, S> PaymentPipeline<W, C, S>
where
    W: WalletSession,
    C: ChainRpc,
    S: CreditStore,
{
    pub fn new(wallet: W, chain: C, ledger: Arc<CreditLedger<S>>, treasury: WalletAddress) -> Self {
        Self {
            wallet,
            chain,
            ledger,
            treasury,
            verify_client: None,
            session_token: StdMutex::new(None),
            phase: StdMutex::new(PaymentPhase::Idle),
        }
    }

    /// Configure the best-effort server verification call.
    pub fn with_verify_client(mut self, client: VerifyClient) -> Self {
        self.verify_client = Some(client);
        self
    }

    /// The current phase of the in-flight (or last) attempt.
    pub fn phase(&self) -> PaymentPhase {
        *self.phase.lock().expect("phase state poisoned")
    }

    fn set_phase(&self, phase: PaymentPhase) {
        *self.phase.lock().expect("phase state poisoned") = phase;
    }

    /// Run one purchase attempt to a terminal state.
    pub async fn purchase(&self, pack: &CreditPack) -> Result<PaymentReceipt, PaymentError> {
        let result = self.run(pack).await;
        match &result {
            Ok(receipt) => {
                self.set_phase(PaymentPhase::Success);
                tracing::info!(
                    signature = %receipt.signature,
                    credits = receipt.credits,
                    balance = receipt.new_balance,
                    "purchase complete"
                );
            }
            Err(e) => {
                self.set_phase(PaymentPhase::Failed);
                tracing::warn!(error = %e, soft = e.is_soft(), "purchase failed");
            }
        }
        result
    }

    async fn run(&self, pack: &CreditPack) -> Result<PaymentReceipt, PaymentError> {
        self.set_phase(PaymentPhase::WalletAuthorizing);
        let auth = self.authorize().await?;

        self.set_phase(PaymentPhase::TxBuild);
        let blockhash = self
            .chain
            .latest_blockhash()
            .await
            .map_err(chain_error_to_payment_error)?;
        let draft = TransferDraft {
            payer: auth.address.clone(),
            recipient: self.treasury.clone(),
            amount_minor_units: pack.price_minor_units,
            recent_blockhash: blockhash,
        };
        let encoded = draft.encode_base64()?;

        self.set_phase(PaymentPhase::TxSigningSending);
        let response = self
            .wallet
            .sign_and_send(&encoded)
            .await
            .map_err(signing_failure_to_payment_error)?;
        let signature = normalize_signature(&response.into_signature()?)?;

        self.set_phase(PaymentPhase::TxConfirming);
        self.await_confirmation(&signature).await?;

        // Credit immediately — the user must not wait on the verify
        // round-trip to see their balance move.
        let account = AccountId::Wallet(auth.address.clone());
        let new_balance = self
            .ledger
            .grant(
                &account,
                pack.credits,
                EntrySource::ChainPayment,
                Some(signature.to_string()),
                None,
            )
            .await?;

        self.spawn_verification(&auth.address, &signature, pack);

        Ok(PaymentReceipt {
            signature,
            credits: pack.credits,
            new_balance,
        })
    }

    /// Reauthorize an existing session when possible (no prompt), fall back
    /// to a fresh authorization.
    async fn authorize(&self) -> Result<WalletAuthorization, PaymentError> {
        let cached = self
            .session_token
            .lock()
            .expect("session state poisoned")
            .clone();

        let auth = match cached {
            Some(token) => match self.wallet.reauthorize(&token).await {
                Ok(auth) => auth,
                Err(failure) => {
                    tracing::debug!(
                        error = %failure,
                        "reauthorization failed, requesting fresh authorization"
                    );
                    self.wallet
                        .authorize()
                        .await
                        .map_err(auth_failure_to_payment_error)?
                }
            },
            None => self
                .wallet
                .authorize()
                .await
                .map_err(auth_failure_to_payment_error)?,
        };

        *self.session_token.lock().expect("session state poisoned") =
            Some(auth.auth_token.clone());
        Ok(auth)
    }

    /// Poll until the transaction confirms, errors on chain, or the probe
    /// budget runs out.
    async fn await_confirmation(&self, signature: &TxSignature) -> Result<(), PaymentError> {
        for _ in 0..CONFIRM_MAX_PROBES {
            match self.chain.confirm_transaction(signature).await {
                Ok(status) => {
                    if let Some(err) = status.execution_error {
                        // A signature exists but the transfer failed on
                        // chain — this is a hard failure, not a success.
                        return Err(PaymentError::BroadcastOrConfirmFailed(format!(
                            "transaction failed on chain: {err}"
                        )));
                    }
                    if status.confirmed {
                        return Ok(());
                    }
                }
                Err(ChainRpcError::RateLimited) => {
                    tracing::debug!(signature = %signature, "rate limited while confirming");
                }
                Err(e) => {
                    return Err(PaymentError::BroadcastOrConfirmFailed(e.to_string()));
                }
            }
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
        Err(PaymentError::Timeout)
    }

    /// Fire the best-effort server verification. Never blocks the purchase
    /// result; never reverts the grant.
    fn spawn_verification(&self, payer: &WalletAddress, signature: &TxSignature, pack: &CreditPack) {
        let Some(client) = self.verify_client.clone() else {
            tracing::debug!("no verify endpoint configured, skipping server verification");
            return;
        };
        let request = VerifyAndGrantRequest {
            user_id: payer.to_string(),
            tx_signature: signature.to_string(),
            expected_recipient: self.treasury.to_string(),
            expected_amount_min: pack.price_minor_units,
            credit_delta: pack.credits,
        };
        tokio::spawn(async move {
            match client.verify_and_grant(&request).await {
                Ok(resp) if resp.ok => {
                    tracing::info!(
                        ledger_ref = %resp.ledger_ref,
                        granted = resp.granted_credits,
                        "server confirmed payment"
                    );
                }
                Ok(resp) => {
                    tracing::warn!(
                        ledger_ref = %resp.ledger_ref,
                        error = resp.error.as_deref().unwrap_or("unspecified"),
                        "server rejected payment; local credit stands"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "server verification unreachable; local credit stands");
                }
            }
        });
    }
}

fn auth_failure_to_payment_error(failure: WalletFailure) -> PaymentError {
    match failure.kind {
        WalletFailureKind::Cancelled => PaymentError::Cancelled,
        WalletFailureKind::Timeout => PaymentError::Timeout,
        _ => PaymentError::AuthorizationFailed(failure.message),
    }
}

fn signing_failure_to_payment_error(failure: WalletFailure) -> PaymentError {
    match failure.kind {
        WalletFailureKind::Cancelled => PaymentError::Cancelled,
        WalletFailureKind::Timeout => PaymentError::Timeout,
        WalletFailureKind::InsufficientFunds => PaymentError::InsufficientChainBalance,
        WalletFailureKind::Other => PaymentError::BroadcastOrConfirmFailed(failure.message),
    }
}

fn chain_error_to_payment_error(error: ChainRpcError) -> PaymentError {
    PaymentError::BroadcastOrConfirmFailed(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::pack_for_credits;
    use crate::signing::SigningResponse;
    use arcana_ledger::Entitlements;
    use arcana_nullables::{MemoryStore, NullChainRpc};
    use arcana_types::BalanceReading;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    const PAYER: &str = "4Nd1mYvK7R2ZqpJcW8sThU6eDxGaBfLvMwPnQrSty9Ej";
    const TREASURY: &str = "J6yAhpP1bqAodWDbPEbEBBbN1fWmYUsBdZe8hUgTWKBc";

    fn sig_bytes() -> [u8; 64] {
        [9u8; 64]
    }

    fn base58_sig() -> String {
        bs58::encode(sig_bytes()).into_string()
    }

    /// A scripted wallet for pipeline tests.
    struct NullWallet {
        address: WalletAddress,
        authorize_failure: Option<WalletFailureKind>,
        reauthorize_succeeds: bool,
        signing_response: StdMutex<Option<Result<SigningResponse, WalletFailureKind>>>,
        authorize_calls: StdMutex<u32>,
        reauthorize_calls: StdMutex<u32>,
    }

    impl NullWallet {
        fn new() -> Self {
            // Default script: sign-and-send returns a base64 signature the
            // way real wallets do.
            let base64_sig = BASE64.encode(sig_bytes());
            Self {
                address: WalletAddress::parse(PAYER).unwrap(),
                authorize_failure: None,
                reauthorize_succeeds: true,
                signing_response: StdMutex::new(Some(Ok(SigningResponse::Raw(base64_sig)))),
                authorize_calls: StdMutex::new(0),
                reauthorize_calls: StdMutex::new(0),
            }
        }

        fn failing_authorization(kind: WalletFailureKind) -> Self {
            let mut wallet = Self::new();
            wallet.authorize_failure = Some(kind);
            wallet
        }

        fn with_signing_response(response: Result<SigningResponse, WalletFailureKind>) -> Self {
            let wallet = Self::new();
            *wallet.signing_response.lock().unwrap() = Some(response);
            wallet
        }

        fn auth(&self) -> WalletAuthorization {
            WalletAuthorization {
                address: self.address.clone(),
                auth_token: "session-token".into(),
            }
        }
    }

    impl WalletSession for &NullWallet {
        async fn authorize(&self) -> Result<WalletAuthorization, WalletFailure> {
            *self.authorize_calls.lock().unwrap() += 1;
            match self.authorize_failure {
                Some(kind) => Err(WalletFailure::new(kind, "scripted authorization failure")),
                None => Ok(self.auth()),
            }
        }

        async fn reauthorize(&self, _token: &str) -> Result<WalletAuthorization, WalletFailure> {
            *self.reauthorize_calls.lock().unwrap() += 1;
            if self.reauthorize_succeeds {
                Ok(self.auth())
            } else {
                Err(WalletFailure::new(
                    WalletFailureKind::Other,
                    "session expired",
                ))
            }
        }

        async fn sign_and_send(&self, _tx_base64: &str) -> Result<SigningResponse, WalletFailure> {
            match self.signing_response.lock().unwrap().take() {
                Some(Ok(response)) => Ok(response),
                Some(Err(kind)) => Err(WalletFailure::new(kind, "scripted signing failure")),
                None => Ok(SigningResponse::Raw(BASE64.encode(sig_bytes()))),
            }
        }
    }

    fn pipeline<'a>(
        wallet: &'a NullWallet,
        chain: NullChainRpc,
        store: Arc<MemoryStore>,
    ) -> PaymentPipeline<&'a NullWallet, NullChainRpc, MemoryStore> {
        let ledger = Arc::new(CreditLedger::new(store, Entitlements::none()));
        PaymentPipeline::new(
            wallet,
            chain,
            ledger,
            WalletAddress::parse(TREASURY).unwrap(),
        )
    }

    #[tokio::test]
    async fn purchase_grants_credits_with_signature_reference() {
        let wallet = NullWallet::new();
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, NullChainRpc::new(), store.clone());
        let pack = pack_for_credits(5).unwrap();

        let receipt = pipeline.purchase(pack).await.unwrap();
        assert_eq!(receipt.credits, 5);
        assert_eq!(receipt.new_balance, 5);
        assert_eq!(receipt.signature.as_str(), base58_sig());
        assert_eq!(pipeline.phase(), PaymentPhase::Success);

        let account = AccountId::Wallet(WalletAddress::parse(PAYER).unwrap());
        let ledger = CreditLedger::new(store, Entitlements::none());
        assert_eq!(ledger.balance(&account).unwrap(), BalanceReading::Credits(5));

        let entries = ledger.full_ledger(&account).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source, EntrySource::ChainPayment);
        assert_eq!(entries[0].delta, 5);
        assert_eq!(entries[0].reference.as_deref(), Some(base58_sig().as_str()));
    }

    #[tokio::test]
    async fn cancelled_authorization_is_soft_and_grants_nothing() {
        let wallet = NullWallet::failing_authorization(WalletFailureKind::Cancelled);
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, NullChainRpc::new(), store.clone());
        let pack = pack_for_credits(5).unwrap();

        let err = pipeline.purchase(pack).await.unwrap_err();
        assert!(matches!(err, PaymentError::Cancelled));
        assert!(err.is_soft());
        assert_eq!(pipeline.phase(), PaymentPhase::Failed);

        let account = AccountId::Wallet(WalletAddress::parse(PAYER).unwrap());
        let ledger = CreditLedger::new(store, Entitlements::none());
        assert_eq!(ledger.balance(&account).unwrap(), BalanceReading::Credits(0));
        assert_eq!(ledger.entry_count(&account).unwrap(), 0);
    }

    #[tokio::test]
    async fn insufficient_wallet_funds_map_to_chain_balance_error() {
        let wallet =
            NullWallet::with_signing_response(Err(WalletFailureKind::InsufficientFunds));
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, NullChainRpc::new(), store);
        let pack = pack_for_credits(5).unwrap();

        let err = pipeline.purchase(pack).await.unwrap_err();
        assert!(matches!(err, PaymentError::InsufficientChainBalance));
    }

    #[tokio::test]
    async fn on_chain_failure_is_an_error_despite_the_signature() {
        let wallet = NullWallet::new();
        let chain = NullChainRpc::new();
        chain.fail_execution("InstructionError: custom program error");
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, chain, store.clone());
        let pack = pack_for_credits(5).unwrap();

        let err = pipeline.purchase(pack).await.unwrap_err();
        assert!(matches!(err, PaymentError::BroadcastOrConfirmFailed(_)));

        let account = AccountId::Wallet(WalletAddress::parse(PAYER).unwrap());
        let ledger = CreditLedger::new(store, Entitlements::none());
        assert_eq!(ledger.entry_count(&account).unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_transaction_times_out() {
        let wallet = NullWallet::new();
        let chain = NullChainRpc::new();
        chain.delay_confirmation(u32::MAX);
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, chain, store);
        let pack = pack_for_credits(5).unwrap();

        let err = pipeline.purchase(pack).await.unwrap_err();
        assert!(matches!(err, PaymentError::Timeout));
        assert!(err.is_soft());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_confirmation_eventually_succeeds() {
        let wallet = NullWallet::new();
        let chain = NullChainRpc::new();
        chain.delay_confirmation(3);
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, chain, store);
        let pack = pack_for_credits(20).unwrap();

        let receipt = pipeline.purchase(pack).await.unwrap();
        assert_eq!(receipt.new_balance, 20);
    }

    #[tokio::test]
    async fn second_purchase_reuses_the_session() {
        let wallet = NullWallet::new();
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, NullChainRpc::new(), store);
        let pack = pack_for_credits(5).unwrap();

        pipeline.purchase(pack).await.unwrap();
        pipeline.purchase(pack).await.unwrap();

        // First purchase prompts; the second silently reauthorizes.
        assert_eq!(*wallet.authorize_calls.lock().unwrap(), 1);
        assert_eq!(*wallet.reauthorize_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn expired_session_falls_back_to_fresh_authorization() {
        let mut wallet = NullWallet::new();
        wallet.reauthorize_succeeds = false;
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, NullChainRpc::new(), store);
        let pack = pack_for_credits(5).unwrap();

        pipeline.purchase(pack).await.unwrap();
        pipeline.purchase(pack).await.unwrap();

        assert_eq!(*wallet.reauthorize_calls.lock().unwrap(), 1);
        assert_eq!(*wallet.authorize_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn malformed_signing_response_fails_loudly() {
        let wallet =
            NullWallet::with_signing_response(Ok(SigningResponse::Signatures(vec![])));
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, NullChainRpc::new(), store);
        let pack = pack_for_credits(5).unwrap();

        let err = pipeline.purchase(pack).await.unwrap_err();
        assert!(matches!(err, PaymentError::MalformedSigningResponse(_)));
    }

    #[tokio::test]
    async fn already_base58_signature_is_not_double_encoded() {
        let wallet =
            NullWallet::with_signing_response(Ok(SigningResponse::Raw(base58_sig())));
        let store = Arc::new(MemoryStore::new());
        let pipeline = pipeline(&wallet, NullChainRpc::new(), store);
        let pack = pack_for_credits(5).unwrap();

        let receipt = pipeline.purchase(pack).await.unwrap();
        assert_eq!(receipt.signature.as_str(), base58_sig());
    }
}
