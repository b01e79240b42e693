use crate::client::GourmetClient;
use crate::http::HttpClient;
use crate::poller::{PollHandle, Poller};
use crate::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use shared::ErrorCode;
use shared::models::{Order, OrderItem, OrderStatus};
use shared::util::minutes_between;
use std::collections::HashMap;
use std::sync::Arc;

/// One card per guest session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCard {
    pub session_id: String,
    /// Raw orders merged into this card, in arrival order
    pub order_ids: Vec<String>,
    pub table_id: String,
    pub table_number: String,
    pub branch_id: String,
    pub branch_name: String,
    /// Least advanced status among the merged orders
    pub status: OrderStatus,
    /// Earliest order time among the merged orders
    pub order_time: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub wait_minutes: i64,
}

impl SessionCard {
    fn start(order: &Order) -> Self {
        Self {
            session_id: order.session_id.clone(),
            order_ids: vec![order.order_id.clone()],
            table_id: order.table_id.clone(),
            table_number: order.table_number.clone(),
            branch_id: order.branch_id.clone(),
            branch_name: order.branch_name.clone(),
            status: order.status,
            order_time: order.order_time,
            items: order.items.clone(),
            wait_minutes: 0,
        }
    }

    fn absorb(&mut self, order: &Order) {
        self.items.extend(order.items.iter().cloned());
        self.order_ids.push(order.order_id.clone());
        self.status = self.status.least_advanced(order.status);
        if order.order_time < self.order_time {
            self.order_time = order.order_time;
        }
    }

    /// Case-insensitive match on table number, branch name or any item name
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.table_number.to_lowercase().contains(&needle)
            || self.branch_name.to_lowercase().contains(&needle)
            || self
                .items
                .iter()
                .any(|i| i.menu_item_name.to_lowercase().contains(&needle))
    }
}

/// Group orders into one card per session.
///
/// Cards come out in the order their first order appears.
pub fn merge_by_session(orders: &[Order], now: DateTime<Utc>) -> Vec<SessionCard> {
    let mut cards: Vec<SessionCard> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for order in orders {
        match index.get(order.session_id.as_str()) {
            Some(&at) => cards[at].absorb(order),
            None => {
                index.insert(order.session_id.as_str(), cards.len());
                cards.push(SessionCard::start(order));
            }
        }
    }
    for card in &mut cards {
        card.wait_minutes = minutes_between(card.order_time, now);
    }
    cards
}

/// Wait-time ordering of the card list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitSort {
    #[default]
    None,
    Ascending,
    Descending,
}

/// Header counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServeCounts {
    pub ready: usize,
    pub serving: usize,
    pub done: usize,
}

/// Staff view of one branch
pub struct StaffBoard<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    branch_id: String,
    cards: Vec<SessionCard>,
    search: String,
    sort: WaitSort,
}

impl<H: HttpClient + 'static> StaffBoard<H> {
    pub fn new(client: Arc<GourmetClient<H>>, branch_id: impl Into<String>) -> Self {
        Self {
            client,
            branch_id: branch_id.into(),
            cards: Vec::new(),
            search: String::new(),
            sort: WaitSort::None,
        }
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    /// Replace the cards from a raw order list
    pub fn apply(&mut self, orders: &[Order], now: DateTime<Utc>) {
        let staff_orders: Vec<Order> = orders
            .iter()
            .filter(|o| o.status.on_staff_board())
            .cloned()
            .collect();
        self.cards = merge_by_session(&staff_orders, now);
        tracing::debug!(
            branch_id = %self.branch_id,
            raw = staff_orders.len(),
            cards = self.cards.len(),
            "Staff board merged by session"
        );
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let orders = self
            .client
            .list_orders(Some(&self.branch_id), None)
            .await?;
        self.apply(&orders, Utc::now());
        Ok(())
    }

    pub fn cards(&self) -> &[SessionCard] {
        &self.cards
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_lowercase();
    }

    pub fn set_sort(&mut self, sort: WaitSort) {
        self.sort = sort;
    }

    /// Searched and sorted cards, `done` included
    pub fn visible(&self) -> Vec<&SessionCard> {
        let mut cards: Vec<&SessionCard> = self
            .cards
            .iter()
            .filter(|c| c.matches(&self.search))
            .collect();
        match self.sort {
            WaitSort::None => {}
            WaitSort::Ascending => cards.sort_by_key(|c| c.wait_minutes),
            WaitSort::Descending => cards.sort_by_key(|c| std::cmp::Reverse(c.wait_minutes)),
        }
        cards
    }

    /// Cards still needing a server
    pub fn active(&self) -> Vec<&SessionCard> {
        self.visible()
            .into_iter()
            .filter(|c| c.status != OrderStatus::Done)
            .collect()
    }

    pub fn counts(&self) -> ServeCounts {
        let mut counts = ServeCounts::default();
        for card in &self.cards {
            match card.status {
                OrderStatus::Ready => counts.ready += 1,
                OrderStatus::Serving => counts.serving += 1,
                OrderStatus::Done => counts.done += 1,
                _ => {}
            }
        }
        counts
    }

    fn card(&self, session_id: &str) -> ClientResult<&SessionCard> {
        self.cards
            .iter()
            .find(|c| c.session_id == session_id)
            .ok_or_else(|| ClientError::rejected(ErrorCode::SessionNotFound))
    }

    /// `ready -> serving` for every order on the card
    pub async fn start_serving(&mut self, session_id: &str) -> ClientResult<()> {
        let order_ids = self.card(session_id)?.order_ids.clone();
        update_all(&self.client, &order_ids, OrderStatus::Serving).await?;
        tracing::info!(session_id, orders = order_ids.len(), "Serving started");
        self.refresh().await
    }

    /// `serving -> done` for every order on the card
    pub async fn complete_serving(&mut self, session_id: &str) -> ClientResult<()> {
        let order_ids = self.card(session_id)?.order_ids.clone();
        update_all(&self.client, &order_ids, OrderStatus::Done).await?;
        tracing::info!(session_id, orders = order_ids.len(), "Serving completed");
        self.refresh().await
    }

    /// Background refresh of the raw order list at the board interval
    pub fn spawn_refresh(&self) -> PollHandle<Vec<Order>> {
        let client = Arc::clone(&self.client);
        let branch_id = self.branch_id.clone();
        Poller::spawn(
            "staff-board",
            client.config().board_refresh_interval,
            move || {
                let client = Arc::clone(&client);
                let branch_id = branch_id.clone();
                async move { client.list_orders(Some(&branch_id), None).await }
            },
        )
    }
}

/// Update all orders concurrently; any failure fails the whole action
async fn update_all<H: HttpClient>(
    client: &GourmetClient<H>,
    order_ids: &[String],
    status: OrderStatus,
) -> ClientResult<()> {
    try_join_all(
        order_ids
            .iter()
            .map(|id| client.update_order_status(id, status)),
    )
    .await?;
    Ok(())
}
