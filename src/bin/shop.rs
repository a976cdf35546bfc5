use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use elysian_shop::catalog::view::SectionBody;
use elysian_shop::checkout::{CheckoutInput, SubmitOutcome};
use elysian_shop::page::{CatalogEffect, CatalogEvent};
use elysian_shop::models::{CancelItem, CancelRequest, FeedbackReport, TeamApplication};
use elysian_shop::{Category, ShopClientBuilder, ShopConfig};

#[derive(Parser, Debug)]
#[command(name = "shop", about = "ElysianLink shop client")]
struct Cli {
    /// Backend base URL (overrides SHOP_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Show every category, including the ones excluded by default
    #[arg(long, global = true)]
    all_categories: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog grouped by section
    Catalog {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        /// Print normalized products as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Refresh a local snapshot from the backend
    Snapshot {
        #[arg(long, default_value = elysian_shop::config::LOCAL_SNAPSHOT_PATH)]
        out: String,
    },
    /// Create an order and print the payment URL
    Checkout {
        #[arg(long)]
        id: String,
        #[arg(long)]
        nick: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        agree: bool,
    },
    /// Cancel or refund a payment
    Cancel {
        #[arg(long)]
        payment_id: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        email: String,
        /// Receipt line as NAME=PRICE, repeatable
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Send a feedback report to the staff chat
    Feedback {
        #[arg(long)]
        nick: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        contact_method: String,
        #[arg(long)]
        contact_info: String,
        #[arg(long)]
        message: String,
    },
    /// Send a team application to the staff chat
    Apply {
        #[arg(long)]
        nick: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        experience: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        about: String,
    },
}

fn parse_item(raw: &str) -> anyhow::Result<CancelItem> {
    let (name, price) = raw
        .rsplit_once('=')
        .with_context(|| format!("item '{raw}' is not NAME=PRICE"))?;
    Ok(CancelItem {
        name: name.to_string(),
        price: price.parse().with_context(|| format!("bad price in '{raw}'"))?,
        quantity: 1,
    })
}

fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    elysian_shop::logging::init_tracing("elysian_shop=info")?;

    let cli = Cli::parse();
    let mut config = ShopConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if cli.all_categories {
        config.excluded_categories.clear();
    }
    if let Command::Catalog { category: Some(_), .. } = &cli.command {
        config.single_category_view = true;
    }
    let shop = ShopClientBuilder::from_config(config).build()?;

    match cli.command {
        Command::Catalog {
            category,
            subcategory,
            json,
        } => {
            let mut page = shop.catalog_page(format!("{}/", shop.config().api_url));
            let mut rendered = page.init(|| shop.catalog().fetch());
            if let Some(notice) = page.notice() {
                eprintln!("{notice}");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(page.products())?);
                return Ok(());
            }
            if let Some(raw) = category {
                let Some(category) = Category::parse(&raw) else {
                    bail!("unknown category '{raw}'");
                };
                if let CatalogEffect::Render(next) = page.dispatch(CatalogEvent::TabClicked(category))? {
                    rendered = next;
                }
            }
            if let Some(sub) = subcategory {
                if let CatalogEffect::Render(next) = page.dispatch(CatalogEvent::SubfilterClicked(sub))? {
                    rendered = next;
                }
            }
            if rendered.empty_state {
                println!("Ничего не найдено");
            }
            for section in &rendered.sections {
                println!("== {} ({})", section.category.label(), section.count);
                match &section.body {
                    SectionBody::Cards(cards) => {
                        for card in cards {
                            println!("  [{}] {}  {}", card.id, card.title, card.price);
                        }
                    }
                    SectionBody::Grouped(groups) => {
                        for group in groups {
                            println!("  -- {}", group.label);
                            for card in &group.cards {
                                println!("    [{}] {}  {}", card.id, card.title, card.price);
                            }
                        }
                    }
                }
            }
        }
        Command::Snapshot { out } => {
            let count = shop.catalog().save_snapshot(&out)?;
            println!("wrote {count} products to {out}");
        }
        Command::Checkout {
            id,
            nick,
            email,
            agree,
        } => {
            let product = shop.checkout().resolve(&id)?;
            let session = shop.checkout().session(product);
            match session.submit(&CheckoutInput::new(nick, email, agree))? {
                SubmitOutcome::Redirect(url) => println!("{url}"),
                SubmitOutcome::Completed(value) => println!("{value}"),
                SubmitOutcome::Ignored => bail!("a submission is already in progress"),
            }
        }
        Command::Cancel {
            payment_id,
            amount,
            email,
            items,
        } => {
            let items = items
                .iter()
                .map(|raw| parse_item(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let response = shop.admin().cancel_payment(&CancelRequest {
                payment_id,
                amount,
                email,
                items,
            })?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.success {
                bail!(response.message.unwrap_or_else(|| "cancel rejected".into()));
            }
        }
        Command::Feedback {
            nick,
            reason,
            contact_method,
            contact_info,
            message,
        } => {
            shop.notify().send_feedback(&FeedbackReport {
                player_nick: nick,
                reason,
                contact_method,
                contact_info,
                message,
            })?;
            println!("{}", elysian_shop::notify::SENT_MESSAGE);
        }
        Command::Apply {
            nick,
            age,
            position,
            experience,
            contact,
            about,
        } => {
            shop.notify().send_application(&TeamApplication {
                player_nick: nick,
                age,
                position,
                experience,
                contact,
                about,
            })?;
            println!("{}", elysian_shop::notify::SENT_MESSAGE);
        }
    }

    Ok(())
}
