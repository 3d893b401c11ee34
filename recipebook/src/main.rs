//! `recipebook` developer console: drives the screen state holders against
//! the local backend and prints the resulting state.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
#![expect(clippy::print_stdout, reason = "the console reports results on stdout")]

use std::env;
use std::ffi::OsString;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use recipebook::domain::{Recipe, User, filter_labels};
use recipebook::view_state::{
    AuthViewState, DetailState, FeedStatus, ProfileState, ProfileViewState, RecipeDetailState,
    RecipeFormState, RecipeListState, ThemeState, resolve_start_destination,
};
use recipebook::{AppContext, AppSettings, local_context};

/// `recipebook` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "recipebook",
    about = "Drive the Recipe Book screens against the local backend",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the launch destination.
    Start,
    /// Create an account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        country: String,
    },
    /// Sign in.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Do not keep the session across launches.
        #[arg(long)]
        no_remember: bool,
    },
    /// Sign out and forget the remembered login.
    Logout,
    /// List recipes, optionally filtered.
    Feed {
        /// Case-insensitive title search.
        #[arg(long, default_value = "")]
        query: String,
        /// Category label, or `All`.
        #[arg(long, default_value = "All")]
        category: String,
    },
    /// Show one recipe.
    Show { id: String },
    /// Create a recipe, or overwrite one with `--id`.
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: String,
        /// Comma-separated.
        #[arg(long)]
        ingredients: String,
        /// Comma- or newline-separated.
        #[arg(long)]
        steps: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        video_url: String,
    },
    /// Delete a recipe.
    Delete { id: String },
    /// Show the signed-in user's profile and recipes.
    Profile,
    /// Change name, country and photo.
    UpdateProfile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        country: String,
        /// Blank removes the current photo.
        #[arg(long, default_value = "")]
        photo_url: String,
    },
    /// List the category filter labels.
    Categories,
    /// Show or change the theme.
    Theme { action: Option<ThemeAction> },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeAction {
    Toggle,
    Dark,
    Light,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let args = CliArgs::parse();
    let settings = AppSettings::load_from_iter([OsString::from("recipebook")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let ctx = local_context(&settings).wrap_err("failed to open local backend")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;
    runtime.block_on(run(ctx, args.command))
}

fn init_tracing() {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let result = if env::var_os("RECIPEBOOK_LOG_JSON").is_some() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn run(ctx: AppContext, command: Command) -> Result<()> {
    match command {
        Command::Start => {
            let destination = resolve_start_destination(&ctx).await;
            println!("{}", destination.route());
        }
        Command::Register {
            name,
            email,
            password,
            country,
        } => {
            let auth = AuthViewState::new(ctx);
            auth.register(&name, &email, &password, &country).await?;
            println!("Registered {email}. Log in to continue.");
        }
        Command::Login {
            email,
            password,
            no_remember,
        } => {
            let auth = AuthViewState::new(ctx);
            auth.remember_login(!no_remember);
            auth.login(&email, &password).await?;
            println!("Signed in as {email}.");
        }
        Command::Logout => {
            ProfileViewState::new(ctx).logout().await;
            println!("Signed out.");
        }
        Command::Feed { query, category } => {
            let list = RecipeListState::new(&ctx);
            if let FeedStatus::Stale { message } = list.ready().await {
                return Err(eyre!("recipe feed unavailable: {message}"));
            }
            list.set_query(query);
            list.set_category(category);
            let visible = list.visible();
            if visible.is_empty() {
                println!("No recipes.");
            }
            for recipe in &visible {
                println!("{}  {}  [{}]", recipe.id, recipe.title, recipe.category);
            }
        }
        Command::Show { id } => {
            let detail = RecipeDetailState::new(ctx);
            detail.load_recipe(&id).await?;
            if let DetailState::Success { recipe, is_creator } = detail.state() {
                print_recipe(&recipe);
                if is_creator {
                    println!("(you created this recipe)");
                }
            }
        }
        Command::Save {
            id,
            title,
            ingredients,
            steps,
            category,
            video_url,
        } => {
            let form = RecipeFormState::new(ctx);
            if let Some(id) = id.as_deref() {
                form.load_recipe(id).await?;
            }
            form.set_title(title);
            form.set_ingredients(ingredients);
            form.set_steps(steps);
            form.set_category(category);
            form.set_video_url(video_url);
            form.submit_recipe().await?;
            println!("Saved.");
        }
        Command::Delete { id } => {
            let detail = RecipeDetailState::new(ctx);
            detail.delete_recipe(&id).await?;
            println!("Deleted {id}.");
        }
        Command::Profile => {
            let profile = ProfileViewState::new(ctx);
            profile.load().await?;
            print_profile(&profile.state());
        }
        Command::UpdateProfile {
            name,
            country,
            photo_url,
        } => {
            let profile = ProfileViewState::new(ctx);
            profile.update_profile(&name, &country, &photo_url).await?;
            print_profile(&profile.state());
        }
        Command::Categories => {
            for label in filter_labels() {
                println!("{label}");
            }
        }
        Command::Theme { action } => {
            let theme = ThemeState::new(ctx);
            match action {
                Some(ThemeAction::Toggle) => theme.toggle_theme()?,
                Some(ThemeAction::Dark) => theme.set_dark_theme(true)?,
                Some(ThemeAction::Light) => theme.set_dark_theme(false)?,
                None => {}
            }
            println!("{}", if theme.is_dark() { "dark" } else { "light" });
        }
    }
    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    println!("{} ({})", recipe.title, recipe.category);
    println!("Ingredients:");
    for ingredient in &recipe.ingredients_list {
        println!("  - {ingredient}");
    }
    println!("Steps:");
    for (number, step) in recipe.steps_list.iter().enumerate() {
        println!("  {}. {step}", number + 1);
    }
    if let Some(video) = &recipe.video_url {
        println!("Video: {video}");
    }
    if let Some(image) = &recipe.image_url {
        println!("Image: {image}");
    }
}

fn print_profile(state: &ProfileState) {
    match state {
        ProfileState::Success { user, user_recipes } => {
            print_user(user);
            println!("Recipes ({}):", user_recipes.len());
            for recipe in user_recipes {
                println!("  {}  {}", recipe.id, recipe.title);
            }
        }
        ProfileState::LoggedOut => println!("Not signed in."),
        ProfileState::Loading => println!("Loading..."),
        ProfileState::Error { message } => println!("{message}"),
    }
}

fn print_user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    if !user.country.is_empty() {
        println!("Country: {}", user.country);
    }
    if let Some(photo) = &user.photo_url {
        println!("Photo: {photo}");
    }
}
