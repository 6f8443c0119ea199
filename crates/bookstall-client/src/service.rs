//! Cart and order services.
//!
//! Services own their state explicitly and receive their resources by
//! injection; there is no process-wide cart or order singleton. Mutation
//! failures are reported once, over the notice channel, after the
//! optimistic state has been rolled back.

use std::sync::Arc;

use bookstall_commerce::cart::{
    compute_totals, CartLine, Selection, ShippingPolicy, Totals, Voucher, MAX_QUANTITY_PER_LINE,
};
use bookstall_commerce::ids::{BookId, LineId, OrderId, UserId};
use bookstall_commerce::order::{
    filter_for_list, normalize_for_detail, transition, Order, OrderProduct, OrderStatus,
    OrderWarning, PaymentDetails, PaymentStatus, Receiver, ShippingDetails,
};
use bookstall_commerce::CommerceError;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::handoff::{HandoffStore, HandoffToken};
use crate::optimistic::{MutationTracker, PendingKind};
use crate::reconcile::Invalidation;
use crate::resource::{CartResource, CatalogLookup, OrderResource};
use crate::store::CartStore;

/// A one-shot notification delivered after an asynchronous mutation
/// settles badly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotice {
    /// A mutation failed; its optimistic state has been rolled back.
    MutationFailed {
        line: LineId,
        attempted: PendingKind,
        error: ClientError,
    },
}

/// Client-side cart service: canonical snapshot, optimistic overlay,
/// pricing, and checkout handoff.
pub struct CartService {
    store: CartStore,
    tracker: MutationTracker,
    handoff: HandoffStore,
    config: ClientConfig,
    notices: mpsc::UnboundedSender<CartNotice>,
}

impl CartService {
    /// Create a service over the given resources. The returned receiver
    /// delivers mutation-failure notices.
    pub fn new(
        resource: Arc<dyn CartResource>,
        catalog: Arc<dyn CatalogLookup>,
        user: Option<UserId>,
        config: ClientConfig,
    ) -> (Self, mpsc::UnboundedReceiver<CartNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                store: CartStore::new(resource, catalog, user),
                tracker: MutationTracker::new(),
                handoff: HandoffStore::new(),
                config,
                notices: tx,
            },
            rx,
        )
    }

    /// Refetch the canonical cart and return the displayed view:
    /// pending intents overlaid, lines pending removal hidden.
    pub async fn list_cart(&mut self) -> Result<Vec<CartLine>, ClientError> {
        self.store.refresh().await?;
        Ok(self.displayed())
    }

    /// The displayed view over the current snapshot, without refetching.
    pub fn displayed(&self) -> Vec<CartLine> {
        self.tracker.overlay(self.store.lines())
    }

    /// Price a selection of the displayed cart.
    pub fn compute_totals(
        &self,
        selection: &Selection,
        voucher: Option<&Voucher>,
    ) -> Result<Totals, ClientError> {
        let lines = self.displayed();
        Ok(compute_totals(
            &lines,
            selection,
            &self.config.shipping,
            voucher,
        )?)
    }

    /// Append a new line for a book. Duplicate books get a second line.
    pub async fn add_line(&mut self, book_id: BookId, quantity: i64) -> Result<LineId, ClientError> {
        self.store.add_line(book_id, quantity).await
    }

    /// Submit a quantity change. The displayed quantity changes
    /// immediately; the remote call settles afterwards. A target of zero
    /// or below is a removal.
    ///
    /// Transport failure is not returned here: the optimistic state
    /// rolls back and one `MutationFailed` notice is emitted. The user
    /// must re-issue the action; nothing retries.
    pub async fn submit_quantity(
        &mut self,
        line_id: &LineId,
        quantity: i64,
    ) -> Result<(), ClientError> {
        if quantity <= 0 {
            return self.remove_line(line_id).await;
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::ValidationError(format!(
                "quantity {} exceeds maximum allowed ({})",
                quantity, MAX_QUANTITY_PER_LINE
            ))
            .into());
        }
        self.store.require_user()?;
        if self.store.line(line_id).is_none() {
            return Err(ClientError::LineNotFound(line_id.to_string()));
        }

        let seq = self.tracker.submit_quantity(line_id, quantity);
        match self.store.set_quantity(line_id, quantity).await {
            Ok(_) => {
                self.tracker.settle_success(line_id, seq);
                Ok(())
            }
            Err(error) => {
                self.tracker.settle_failure(line_id, seq);
                self.notify_failure(line_id, PendingKind::Update { target_qty: quantity }, error);
                Ok(())
            }
        }
    }

    /// Submit a removal. The line disappears from the display
    /// immediately; failure brings it back and emits one notice.
    pub async fn remove_line(&mut self, line_id: &LineId) -> Result<(), ClientError> {
        self.store.require_user()?;
        if self.store.line(line_id).is_none() {
            return Err(ClientError::LineNotFound(line_id.to_string()));
        }

        let seq = self.tracker.submit_removal(line_id);
        match self.store.remove_line(line_id).await {
            Ok(()) => {
                self.tracker.settle_success(line_id, seq);
                Ok(())
            }
            Err(error) => {
                self.tracker.settle_failure(line_id, seq);
                self.notify_failure(line_id, PendingKind::Removal, error);
                Ok(())
            }
        }
    }

    /// Handle a soft invalidation trigger: refetch and merge under any
    /// pending optimistic state.
    pub async fn invalidate(&mut self, trigger: Invalidation) -> Result<(), ClientError> {
        debug!(trigger = trigger.as_str(), "cart invalidated, refetching");
        self.store.refresh().await
    }

    /// Snapshot the selected displayed lines under a single-use token.
    pub fn handoff_selection(&mut self, selection: &Selection) -> HandoffToken {
        let lines: Vec<CartLine> = self
            .displayed()
            .into_iter()
            .filter(|l| selection.contains(&l.id))
            .collect();
        info!(count = lines.len(), "cart selection handed off to checkout");
        self.handoff.handoff(lines)
    }

    /// Consume a handoff token. A second consume returns
    /// `HandoffNotFound`.
    pub fn consume_handoff(&mut self, token: &HandoffToken) -> Result<Vec<CartLine>, ClientError> {
        self.handoff.consume(token)
    }

    /// Load the lines checkout should operate on.
    ///
    /// With a token, the handed-off snapshot. Without one, the consumer
    /// falls back to the full current cart, not the prior selection.
    pub async fn checkout_lines(
        &mut self,
        token: Option<&HandoffToken>,
    ) -> Result<Vec<CartLine>, ClientError> {
        match token {
            Some(token) => self.consume_handoff(token),
            None => self.list_cart().await,
        }
    }

    fn notify_failure(&self, line: &LineId, attempted: PendingKind, error: ClientError) {
        let _ = self.notices.send(CartNotice::MutationFailed {
            line: line.clone(),
            attempted,
            error,
        });
    }
}

/// Client-side order service: placement, gated reads, and lifecycle
/// transitions against the order resource.
pub struct OrderService {
    resource: Arc<dyn OrderResource>,
    user: Option<UserId>,
}

impl OrderService {
    /// Create a service over the given resource.
    pub fn new(resource: Arc<dyn OrderResource>, user: Option<UserId>) -> Self {
        Self { resource, user }
    }

    fn require_user(&self) -> Result<&UserId, ClientError> {
        self.user.as_ref().ok_or(ClientError::AuthRequired)
    }

    /// Place an order from checked-out lines. Totals come from the
    /// pricing engine; the order starts `pending`.
    pub async fn place_order(
        &self,
        lines: &[CartLine],
        receiver: Receiver,
        payment_method: impl Into<String>,
        shipping_method: impl Into<String>,
        policy: &ShippingPolicy,
        voucher: Option<&Voucher>,
    ) -> Result<Order, ClientError> {
        let user = self.require_user()?.clone();
        let totals = compute_totals(lines, &Selection::All, policy, voucher)?;

        let products = lines
            .iter()
            .map(|l| OrderProduct {
                id: l.book_id.clone(),
                name: l.title.clone(),
                price: l.unit_price,
                quantity: l.quantity,
                image: l.image.clone(),
            })
            .collect();

        let order = Order::new(
            user,
            receiver,
            products,
            ShippingDetails {
                method: shipping_method.into(),
                cost: totals.shipping_cost,
                discount: bookstall_commerce::Money::zero(),
                estimated_date: None,
            },
            PaymentDetails {
                method: payment_method.into(),
                status: PaymentStatus::Pending,
                amount: totals.total,
            },
            totals.subtotal,
            totals.shipping_cost,
            totals.discount,
            totals.total,
        );

        self.resource.create(&order).await?;
        info!(order = %order.id, total = %order.total, "order placed");
        Ok(order)
    }

    /// Fetch one order for a detail view.
    ///
    /// Core validation failure is fatal and blocks the view; product and
    /// shipping problems come back as warnings next to the order.
    pub async fn get_order(
        &self,
        id: &OrderId,
    ) -> Result<(Order, Vec<OrderWarning>), ClientError> {
        self.require_user()?;
        let raw = self
            .resource
            .get(id)
            .await?
            .ok_or_else(|| ClientError::OrderNotFound(id.to_string()))?;
        Ok(normalize_for_detail(raw)?)
    }

    /// List the user's orders, optionally narrowed to one status.
    /// Orders with invalid core data or invalid products are silently
    /// filtered out.
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, ClientError> {
        let user = self.require_user()?.clone();
        let raws = self.resource.list_by_user(&user).await?;
        let mut orders = filter_for_list(raws);
        if let Some(status) = status {
            orders.retain(|o| o.status == status);
        }
        Ok(orders)
    }

    /// Transition an order to a new status.
    ///
    /// The transition is validated locally first; an illegal one fails
    /// with `InvalidTransition` before any remote call, leaving status
    /// and history untouched.
    pub async fn transition_order(
        &self,
        id: &OrderId,
        new_status: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, ClientError> {
        let user = self.require_user()?.clone();
        let raw = self
            .resource
            .get(id)
            .await?
            .ok_or_else(|| ClientError::OrderNotFound(id.to_string()))?;
        let (mut order, _warnings) = normalize_for_detail(raw)?;

        transition(&mut order, new_status, note.clone(), user.to_string())?;
        self.resource.patch_status(id, new_status, note).await?;
        info!(order = %id, status = %new_status, "order transitioned");
        Ok(order)
    }

    /// Cancel an order with a reason. Only `pending` and `confirmed`
    /// orders can be cancelled.
    pub async fn cancel_order(&self, id: &OrderId, reason: String) -> Result<Order, ClientError> {
        self.transition_order(id, OrderStatus::Cancelled, Some(reason))
            .await
    }
}
