// gourmet-cli/src/commands.rs
// 子命令执行

use crate::{
    AdminCommand, BoardArgs, BoardKind, CartCommand, Command, OwnerCommand, PayArgs, PayMethod,
    PaymentsCommand, Period, StatusCommand,
};
use anyhow::{Context, bail};
use chrono::Utc;
use gourmet_client::admin::{
    PageMove, RestaurantAdmin, RevenueAdmin, UserAdmin, dashboard_or_default,
};
use gourmet_client::board::{KitchenBoard, StaffBoard, WaitSort};
use gourmet_client::cart::{CartStore, Dish};
use gourmet_client::chat::ChatSession;
use gourmet_client::listing::{ListView, Paginator, Searchable};
use gourmet_client::checkout::{TableContext, TableParams};
use gourmet_client::owner::{BranchManager, MenuManager, OwnerDashboard, TableManager};
use gourmet_client::payment::{PaymentFlow, StaffPayments, format_mmss};
use gourmet_client::progress::{GuestStage, Lang};
use gourmet_client::storage::keys;
use gourmet_client::GourmetClient;
use shared::models::{PaymentMethod, RevenuePeriod, StaffBill};
use shared::util::format_vnd;
use std::sync::Arc;

type Client = Arc<GourmetClient>;

pub async fn run(client: Client, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let token = client.login(&email, &password).await?;
            println!("Signed in as {} ({})", token.user.full_name, token.user.role);
        }
        Command::Logout => {
            client.logout().await?;
            println!("Signed out");
        }
        Command::Whoami => match client.session().current_user() {
            Some(user) if client.session().is_authenticated() => {
                let name = user.full_name.as_deref().unwrap_or("-");
                let tenant = user.tenant_id.as_deref().unwrap_or("-");
                println!("{name} <{}> role={} tenant={tenant}", user.email.unwrap_or_default(), user.role);
            }
            _ => println!("Not signed in"),
        },
        Command::Branches => {
            for branch in client.guest_branches().await? {
                println!(
                    "{}  {}  {}  ({} món)",
                    branch.branch_id, branch.branch_name, branch.address, branch.menu_item_count
                );
            }
        }
        Command::Table {
            branch,
            table,
            number,
        } => {
            let params = TableParams {
                branch_id: branch,
                table_id: table,
                table_number: number,
            };
            let context = TableContext::resolve(client.store().as_ref(), &params)?;
            println!(
                "Table {} (id {}, branch {})",
                context.table_number,
                context.table_id.as_deref().unwrap_or("-"),
                context.branch_id.as_deref().unwrap_or("-"),
            );
        }
        Command::Menu { branch, search } => {
            let branch_id = branch_or_current(&client, branch)?;
            let needle = search.map(|s| s.to_lowercase());
            for item in client.guest_menu_items(&branch_id).await? {
                if let Some(needle) = &needle
                    && !item.item_name.to_lowercase().contains(needle)
                {
                    continue;
                }
                println!(
                    "{}  {:<30} {:>12}{}",
                    item.menu_item_id,
                    item.item_name,
                    format_vnd(item.effective_price()),
                    if item.is_available() { "" } else { "  (hết)" },
                );
            }
        }
        Command::Cart(cmd) => cart(&client, cmd).await?,
        Command::Order => {
            let mut cart = CartStore::load(Arc::clone(client.store()));
            let receipt = client.submit_order(&mut cart).await?;
            println!(
                "Order {} placed for table {}: {} items, {}",
                receipt.order_id,
                receipt.table_number,
                receipt.total_items,
                format_vnd(receipt.total_amount),
            );
        }
        Command::Track { order_id } => {
            let order_id = order_id
                .or_else(|| client.store().get(keys::LAST_ORDER_ID))
                .context("no order to track; place one first")?;
            track(&client, &order_id).await;
        }
        Command::Board(args) => board(&client, args).await?,
        Command::Status(cmd) => status(&client, cmd).await?,
        Command::Pay(args) => pay(&client, args).await?,
        Command::Payments(cmd) => payments(&client, cmd).await?,
        Command::Owner(cmd) => owner(&client, cmd).await?,
        Command::Admin(cmd) => admin(&client, cmd).await?,
        Command::Chat {
            branch,
            clear,
            message,
        } => {
            let mut chat = ChatSession::open(Arc::clone(&client), branch)?;
            if clear {
                chat.clear_history().await?;
                println!("Conversation cleared");
                return Ok(());
            }
            let reply = chat.send(&message.join(" ")).await?;
            println!("{}", reply.response);
        }
    }
    Ok(())
}

fn branch_or_current(client: &Client, branch: Option<String>) -> anyhow::Result<String> {
    branch
        .or_else(|| TableContext::stored(client.store().as_ref()).branch_id)
        .context("no branch given and no table selected")
}

async fn cart(client: &Client, cmd: CartCommand) -> anyhow::Result<()> {
    let mut cart = CartStore::load(Arc::clone(client.store()));
    let changed = match cmd {
        CartCommand::Show => true,
        CartCommand::Add {
            branch,
            menu_item_id,
        } => {
            let branch_id = branch_or_current(client, branch)?;
            let items = client.guest_menu_items(&branch_id).await?;
            let Some(item) = items.iter().find(|i| i.menu_item_id == menu_item_id) else {
                bail!("menu item {menu_item_id} is not served at branch {branch_id}");
            };
            cart.add(&Dish::from(item))?;
            true
        }
        CartCommand::Qty { index, quantity } => cart.update_quantity(index, quantity)?,
        CartCommand::Note { index, note } => cart.update_note(index, &note)?,
        CartCommand::Remove { index } => cart.remove(index)?,
        CartCommand::Clear => {
            cart.clear()?;
            true
        }
    };
    if !changed {
        bail!("no cart row at that index");
    }

    for (index, item) in cart.items().iter().enumerate() {
        let note = if item.note.is_empty() {
            String::new()
        } else {
            format!("  [{}]", item.note)
        };
        println!(
            "{index:>2}. {:<30} x{:<3} {:>12}{note}",
            item.name,
            item.quantity,
            format_vnd(item.line_total()),
        );
    }
    println!(
        "{} items, total {}",
        cart.total_quantity(),
        format_vnd(cart.total_price())
    );
    Ok(())
}

async fn track(client: &Client, order_id: &str) {
    let mut handle = client.track_order(order_id);
    let mut last = None;
    loop {
        tokio::select! {
            update = handle.changed() => {
                let Some(status) = update else { break };
                let stage = GuestStage::from(status.status);
                if last != Some(stage) {
                    println!("[{:>3}%] {}", stage.percent(), stage.label(Lang::Vi));
                    last = Some(stage);
                }
                if stage.is_final() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    handle.shutdown().await;
}

async fn board(client: &Client, args: BoardArgs) -> anyhow::Result<()> {
    match args.kind {
        BoardKind::Kitchen => {
            let mut board = KitchenBoard::new(Arc::clone(client), args.branch);
            board.refresh().await?;
            print_kitchen(&board);
            if args.watch {
                let mut handle = board.spawn_refresh();
                loop {
                    tokio::select! {
                        update = handle.changed() => {
                            let Some(orders) = update else { break };
                            board.apply(orders);
                            print_kitchen(&board);
                        }
                        _ = tokio::signal::ctrl_c() => break,
                    }
                }
                handle.shutdown().await;
            }
        }
        BoardKind::Staff => {
            let mut board = StaffBoard::new(Arc::clone(client), args.branch);
            if let Some(search) = &args.search {
                board.set_search(search);
            }
            if args.longest_first {
                board.set_sort(WaitSort::Descending);
            }
            board.refresh().await?;
            print_staff(&board);
            if args.watch {
                let mut handle = board.spawn_refresh();
                loop {
                    tokio::select! {
                        update = handle.changed() => {
                            let Some(orders) = update else { break };
                            board.apply(&orders, Utc::now());
                            print_staff(&board);
                        }
                        _ = tokio::signal::ctrl_c() => break,
                    }
                }
                handle.shutdown().await;
            }
        }
    }
    Ok(())
}

fn print_kitchen(board: &KitchenBoard<gourmet_client::NetworkHttpClient>) {
    let columns = board.columns();
    let (waiting, cooking, ready) = columns.counts();
    println!("waiting {waiting} | cooking {cooking} | ready {ready}");
    for (label, orders) in [
        ("WAIT", &columns.waiting),
        ("COOK", &columns.cooking),
        ("READY", &columns.ready),
    ] {
        for order in orders {
            let items: Vec<_> = order
                .items
                .iter()
                .map(|i| format!("{} x{}", i.menu_item_name, i.quantity))
                .collect();
            println!("{label:<5} {} bàn {}: {}", order.order_id, order.table_number, items.join(", "));
        }
    }
}

fn print_staff(board: &StaffBoard<gourmet_client::NetworkHttpClient>) {
    let counts = board.counts();
    println!(
        "ready {} | serving {} | done {}",
        counts.ready, counts.serving, counts.done
    );
    for card in board.visible() {
        println!(
            "{:<8} {} bàn {} chờ {} phút ({} món)",
            card.status.to_string(),
            card.session_id,
            card.table_number,
            card.wait_minutes,
            card.items.len(),
        );
    }
}

async fn status(client: &Client, cmd: StatusCommand) -> anyhow::Result<()> {
    match cmd {
        StatusCommand::Cook { branch, order_id } => {
            let mut board = KitchenBoard::new(Arc::clone(client), branch);
            board.refresh().await?;
            board.start_cooking(&order_id).await?;
        }
        StatusCommand::Ready { branch, order_id } => {
            let mut board = KitchenBoard::new(Arc::clone(client), branch);
            board.refresh().await?;
            board.finish_cooking(&order_id).await?;
        }
        StatusCommand::Serve { branch, session_id } => {
            let mut board = StaffBoard::new(Arc::clone(client), branch);
            board.refresh().await?;
            board.start_serving(&session_id).await?;
        }
        StatusCommand::Done { branch, session_id } => {
            let mut board = StaffBoard::new(Arc::clone(client), branch);
            board.refresh().await?;
            board.complete_serving(&session_id).await?;
        }
    }
    println!("Updated");
    Ok(())
}

async fn pay(client: &Client, args: PayArgs) -> anyhow::Result<()> {
    let flow = PaymentFlow::load(Arc::clone(client), args.session.as_deref()).await?;
    let context = flow.context();
    println!(
        "Bill for table {}: subtotal {}, VAT {}, total {}",
        context.table_number.as_deref().unwrap_or("-"),
        format_vnd(context.subtotal),
        format_vnd(context.vat),
        format_vnd(context.total),
    );

    match args.method {
        PayMethod::Qr => {
            let qr = flow.qr(Utc::now())?;
            println!("Scan: {}", qr.image_url);
            println!(
                "Transfer {} to {} {} ({}), note \"{}\"",
                format_vnd(qr.amount),
                qr.account.bank_code,
                qr.account.account_number,
                qr.account.account_name,
                qr.description,
            );
            println!("Valid for {}", format_mmss(qr.remaining_secs(Utc::now())));
            flow.pay(PaymentMethod::BankTransfer).await?;
            println!("Transfer reported, waiting for staff to verify");
        }
        PayMethod::Cash => {
            flow.pay(PaymentMethod::Cash).await?;
            println!("Cash requested, staff will come to the table");
        }
    }

    if args.wait {
        let status = flow.wait_until_settled().await?;
        println!("Bill {status}");
    }
    Ok(())
}

fn print_bills(title: &str, bills: &[StaffBill]) {
    println!("{title} ({})", bills.len());
    for bill in bills {
        println!(
            "  {}  {}  bàn {}  {}",
            bill.bill_id,
            bill.short_order_id(),
            bill.table_number,
            format_vnd(bill.total_amount),
        );
    }
}

async fn payments(client: &Client, cmd: PaymentsCommand) -> anyhow::Result<()> {
    let (branch, action) = match cmd {
        PaymentsCommand::List { branch } => (branch, None),
        PaymentsCommand::ConfirmCash { branch, bill_id } => (branch, Some((true, bill_id))),
        PaymentsCommand::VerifyQr { branch, bill_id } => (branch, Some((false, bill_id))),
    };
    let mut queues = StaffPayments::new(Arc::clone(client), branch);
    match action {
        Some((true, bill_id)) => {
            queues.confirm_cash(&bill_id).await?;
        }
        Some((false, bill_id)) => {
            queues.verify_qr(&bill_id).await?;
        }
        None => queues.refresh().await?,
    }
    print_bills("Cash pending", queues.cash_pending());
    print_bills("QR paid", queues.qr_paid());
    Ok(())
}

fn print_page<T: Searchable>(view: &ListView<T>, row: impl Fn(&T) -> String) {
    for item in view.page_items() {
        println!("{}", row(item));
    }
    let paginator = view.paginator();
    let (first, last) = paginator.range();
    println!(
        "{first}-{last} of {} (page {}/{})",
        paginator.total(),
        paginator.page(),
        paginator.total_pages().max(1)
    );
}

async fn owner(client: &Client, cmd: OwnerCommand) -> anyhow::Result<()> {
    match cmd {
        OwnerCommand::Stats => {
            let stats = OwnerDashboard::new(Arc::clone(client)).stats_or_default().await;
            println!(
                "branches {} ({} active), tables {}",
                stats.total_branches, stats.active_branches, stats.total_tables
            );
            println!(
                "today {} orders, {}; this month {}",
                stats.today_orders,
                format_vnd(stats.today_revenue),
                format_vnd(stats.monthly_revenue)
            );
        }
        OwnerCommand::Branches { search, page } => {
            let mut branches = BranchManager::new(Arc::clone(client));
            branches.refresh().await?;
            if let Some(search) = search {
                branches.view_mut().search(&search);
            }
            branches.view_mut().paginator_mut().go_to(page);
            print_page(branches.view(), |b| {
                format!("{}  {}  {}  [{}]", b.branch_id, b.branch_name, b.address, b.status)
            });
        }
        OwnerCommand::Tables { branch, page } => {
            let mut tables = TableManager::new(Arc::clone(client), branch);
            tables.refresh().await?;
            tables.view_mut().paginator_mut().go_to(page);
            print_page(tables.view(), |t| {
                format!(
                    "{}  bàn {}  {} chỗ  [{}]",
                    t.table_id,
                    t.table_number,
                    t.capacity.unwrap_or_default(),
                    t.status
                )
            });
        }
        OwnerCommand::Items {
            branch,
            category,
            page,
        } => {
            let mut menu = MenuManager::new(Arc::clone(client), branch);
            menu.select_category(category.as_deref()).await?;
            menu.view_mut().paginator_mut().go_to(page);
            print_page(menu.view(), |m| {
                format!("{}  {:<30} {:>12}  [{}]", m.menu_item_id, m.item_name, format_vnd(m.price), m.status)
            });
        }
    }
    Ok(())
}

fn print_paging(paginator: &Paginator) {
    println!(
        "page {}/{} ({} total)",
        paginator.page(),
        paginator.total_pages().max(1),
        paginator.total()
    );
}

async fn admin(client: &Client, cmd: AdminCommand) -> anyhow::Result<()> {
    match cmd {
        AdminCommand::Dashboard => {
            let stats = dashboard_or_default(client).await;
            println!(
                "restaurants {} ({} active), users {} ({} active)",
                stats.total_restaurants,
                stats.active_restaurants,
                stats.total_users,
                stats.active_users
            );
        }
        AdminCommand::Users {
            search,
            page,
            toggle,
        } => {
            let mut users = UserAdmin::new(Arc::clone(client));
            match search {
                Some(search) => users.search(&search).await?,
                None => users.refresh().await?,
            }
            users.go(PageMove::To(page)).await?;
            if let Some(user_id) = toggle {
                let status = users.toggle_status(&user_id).await?;
                println!("{user_id} is now {}", status.as_str());
            }
            for user in users.page().rows() {
                println!(
                    "{}  {:<24} {:<28} {:<8} {}",
                    user.user_id,
                    user.name,
                    user.email,
                    user.role,
                    user.status.as_str()
                );
            }
            print_paging(users.page().paginator());
        }
        AdminCommand::Restaurants { search, page } => {
            let mut restaurants = RestaurantAdmin::new(Arc::clone(client));
            match search {
                Some(search) => restaurants.search(&search).await?,
                None => restaurants.refresh().await?,
            }
            restaurants.go(PageMove::To(page)).await?;
            for row in restaurants.page().rows() {
                println!(
                    "{}  {:<28} {} chi nhánh  {}  {}",
                    row.tenant_id,
                    row.name,
                    row.branch_count,
                    format_vnd(row.revenue),
                    row.status.as_str()
                );
            }
            print_paging(restaurants.page().paginator());
        }
        AdminCommand::Revenue { period, page } => {
            let mut revenue = RevenueAdmin::new(Arc::clone(client));
            revenue
                .set_period(match period {
                    Period::Today => RevenuePeriod::Today,
                    Period::Month => RevenuePeriod::Month,
                    Period::All => RevenuePeriod::All,
                })
                .await?;
            revenue.go(PageMove::To(page)).await?;
            for row in revenue.page().rows() {
                println!(
                    "{}  {:<28} {:>6} đơn  {}",
                    row.tenant_id,
                    row.name,
                    row.orders,
                    format_vnd(row.revenue)
                );
            }
            if let Some(total) = revenue.total_orders() {
                println!("{total} orders over {}", revenue.period().as_str());
            }
            print_paging(revenue.page().paginator());
        }
    }
    Ok(())
}
