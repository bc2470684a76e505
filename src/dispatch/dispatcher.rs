//! The single entry point that routes calls to the engines.
//!
//! Every state-changing call runs against a draft of the store. The draft
//! replaces the committed store only when the call succeeds, so a failed
//! call leaves no trace. Committed mutations are appended to a journal
//! that [`Dispatcher::replay`] can re-apply to reproduce the same state.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::call::{Call, CallRecord};
use super::envelope::{Envelope, Reply};
use crate::auction;
use crate::core::{EngineConfig, GameRng, Store, UserId};
use crate::error::EngineResult;
use crate::hands;
use crate::ledger;
use crate::supply::{self, CardSource};

/// RNG stream name used for card purchases.
const SUPPLY_CONTEXT: &str = "card-supply";

/// Owns the store and applies calls to it one at a time.
#[derive(Clone, Debug)]
pub struct Dispatcher<S: CardSource = GameRng> {
    config: EngineConfig,
    store: Store,
    source: S,
    journal: Vec<CallRecord>,
}

impl Dispatcher<GameRng> {
    /// Create a dispatcher drawing cards from an RNG seeded by `config.seed`.
    #[must_use]
    pub fn seeded(config: EngineConfig) -> Self {
        let source = GameRng::new(config.seed).for_context(SUPPLY_CONTEXT);
        Self::new(config, source)
    }
}

impl<S: CardSource> Dispatcher<S> {
    /// Create a dispatcher over an empty store.
    pub fn new(config: EngineConfig, source: S) -> Self {
        Self::with_store(config, Store::new(), source)
    }

    /// Resume from an existing store, e.g. one restored from a snapshot.
    pub fn with_store(config: EngineConfig, store: Store, source: S) -> Self {
        Self {
            config,
            store,
            source,
            journal: Vec::new(),
        }
    }

    /// The rules this dispatcher runs under.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The committed store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Committed mutating calls, oldest first.
    #[must_use]
    pub fn journal(&self) -> &[CallRecord] {
        &self.journal
    }

    /// The card source, positioned after the last committed draw.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the dispatcher, keeping only the committed store.
    #[must_use]
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Apply one call on behalf of `caller`.
    ///
    /// Reads run directly against the committed store. Mutations run on a
    /// draft that is committed and journaled only on success.
    pub fn execute(&mut self, caller: &UserId, call: Call) -> EngineResult<Reply> {
        if call.is_read_only() {
            debug!(caller = %caller, method = call.method(), "read");
            return route(
                &mut self.store,
                &self.config,
                &mut self.source,
                caller,
                &call,
            );
        }

        let mut draft = self.store.clone();
        match route(&mut draft, &self.config, &mut self.source, caller, &call) {
            Ok(reply) => {
                self.store = draft;
                let sequence = self.journal.len() as u64 + 1;
                info!(sequence, caller = %caller, method = call.method(), "call committed");
                self.journal
                    .push(CallRecord::new(sequence, caller.clone(), call));
                Ok(reply)
            }
            Err(err) => {
                warn!(
                    caller = %caller,
                    method = call.method(),
                    kind = ?err.kind(),
                    error = %err,
                    "call rejected"
                );
                Err(err)
            }
        }
    }

    /// Decode and apply a call given as method name and JSON params,
    /// answering with an envelope.
    pub fn handle(&mut self, caller: &UserId, method: &str, params: Value) -> Envelope {
        let outcome = Call::from_method(method, params).and_then(|call| self.execute(caller, call));
        if let Err(err) = &outcome {
            debug!(caller = %caller, method, error = %err, "call failed");
        }
        Envelope::from_outcome(outcome)
    }

    /// Like [`Dispatcher::handle`], with params as raw JSON text.
    pub fn handle_json(&mut self, caller: &UserId, method: &str, params: &str) -> Envelope {
        match serde_json::from_str(params) {
            Ok(params) => self.handle(caller, method, params),
            Err(err) => Envelope::from_outcome(Err(err.into())),
        }
    }

    /// Rebuild a dispatcher by re-applying journaled calls in order.
    ///
    /// With the same config and an identically seeded source, the result
    /// matches the dispatcher that produced the journal.
    pub fn replay<'a>(
        config: EngineConfig,
        source: S,
        records: impl IntoIterator<Item = &'a CallRecord>,
    ) -> EngineResult<Self> {
        let mut dispatcher = Self::new(config, source);
        for record in records {
            dispatcher.execute(&record.caller, record.call.clone())?;
        }
        Ok(dispatcher)
    }
}

fn route(
    store: &mut Store,
    config: &EngineConfig,
    source: &mut dyn CardSource,
    caller: &UserId,
    call: &Call,
) -> EngineResult<Reply> {
    let reply = match call {
        Call::RegisterUser { bio } => Reply::User(ledger::register(store, config, caller, bio)?),
        Call::Deposit { amount } => {
            ledger::deposit(store, caller, *amount)?;
            Reply::Unit
        }
        Call::BuyCards { amount } => {
            Reply::Cards(supply::buy_cards(store, config, source, caller, *amount)?)
        }
        Call::GetUsers {} => Reply::Users(ledger::get_users(store)),
        Call::GetUser { id } => Reply::MaybeUser(ledger::get_user(store, id)),
        Call::GetMyCards {} => Reply::Cards(ledger::get_my_cards(store, caller)),

        Call::StartHand { claim, cards } => {
            Reply::Hand(hands::start_hand(store, caller, *claim, cards)?)
        }
        Call::Stake { hand_id, cards } => Reply::Hand(hands::stake(store, caller, hand_id, cards)?),
        Call::Check { hand_id } => Reply::Bluff(hands::check(store, config, caller, hand_id)?),
        Call::GetHands {} => Reply::Hands(hands::get_hands(store)),
        Call::GetHand { id } => Reply::MaybeHand(hands::get_hand(store, id)),

        Call::Offer { cards, amount } => {
            Reply::Offer(auction::offer(store, caller, cards, *amount)?)
        }
        Call::GetOffers {} => Reply::Offers(auction::get_offers(store)),
        Call::Bid {
            offer_id,
            bid_amount,
        } => {
            auction::bid(store, caller, offer_id, *bid_amount)?;
            Reply::Unit
        }
        Call::Resolve { offer_id } => {
            auction::resolve(store, caller, offer_id)?;
            Reply::Unit
        }
        Call::WithdrawBid { offer_id } => {
            auction::withdraw_bid(store, caller, offer_id)?;
            Reply::Unit
        }
    };
    Ok(reply)
}
