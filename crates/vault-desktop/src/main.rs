//! Vault Desktop Application
//!
//! A single-screen client for a personal data vault: paste text/code or
//! upload small files, stored per user and listed in real time.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod components;
mod services;
mod state;

fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vault=debug".parse().unwrap()),
        )
        .init();

    tracing::info!("Starting Vault...");

    dioxus::launch(app::App);
}
