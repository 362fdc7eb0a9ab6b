//! Admin dashboard components
//!
//! One card per sync action plus the summary figures and an optional log viewer.

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::{self, FetchTransport};
use crate::config::AdminConfig;
use crate::messages::{self, Locale, StatusTone, SyncStatus};
use crate::stats::DashboardStats;
use crate::trigger::{begin_sync, complete_sync, SyncAction, SyncView};

/// Reactive state of one card
#[derive(Clone, Copy)]
pub struct CardSignals {
    busy: RwSignal<bool>,
    status: RwSignal<Option<SyncStatus>>,
    last_sync: RwSignal<Option<String>>,
}

impl CardSignals {
    pub fn new(last_sync: Option<String>) -> Self {
        CardSignals {
            busy: RwSignal::new(false),
            status: RwSignal::new(None),
            last_sync: RwSignal::new(last_sync),
        }
    }
}

impl SyncView for CardSignals {
    fn is_busy(&self) -> bool {
        self.busy.get_untracked()
    }

    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    fn set_status(&self, status: SyncStatus) {
        self.status.set(Some(status));
    }

    fn set_last_sync(&self, label: String) {
        self.last_sync.set(Some(label));
    }
}

/// Button, status line and last-sync label for one action
#[component]
pub fn SyncCard(
    action: SyncAction,
    transport: FetchTransport,
    locale: Locale,
    /// Label shown until this card completes a sync
    initial_last_sync: Option<String>,
) -> impl IntoView {
    let card = CardSignals::new(initial_last_sync);

    let on_click = move |_| {
        // Disable before yielding so a second click cannot slip in
        if !begin_sync(action, &card, locale) {
            return;
        }
        let transport = transport.clone();
        spawn_local(async move {
            let outcome = complete_sync(action, &transport, &card, locale, || Local::now().naive_local()).await;
            tracing::debug!(action = %action, outcome = ?outcome, "sync settled");
        });
    };

    view! {
        <div class="bg-white rounded-lg shadow p-4">
            <h3 class="text-lg font-semibold mb-2">{messages::card_title(action, locale)}</h3>
            <button
                id=action.button_id()
                class="px-4 py-2 bg-blue-600 text-white rounded disabled:opacity-50"
                on:click=on_click
                disabled=move || card.busy.get()
            >
                {messages::button_label(action, locale)}
            </button>
            <div
                id=action.status_id()
                class=move || card.status.get().map(|s| s.tone).unwrap_or(StatusTone::Info).css_class()
            >
                {move || card.status.get().map(|s| s.text).unwrap_or_default()}
            </div>
            <div id=action.last_sync_id() class="mt-1 text-xs text-gray-500">
                {move || card.last_sync.get().unwrap_or_default()}
            </div>
        </div>
    }
}

#[component]
pub fn StatsSummary(stats: DashboardStats, locale: Locale) -> impl IntoView {
    let texts = messages::stats_texts(locale);
    let last_sync = stats
        .last_sync
        .clone()
        .unwrap_or_else(|| messages::not_available(locale).to_string());
    let usage = stats.usage_percent();

    view! {
        <div class="grid grid-cols-3 gap-4 mb-6">
            <div class="bg-white rounded-lg shadow p-4">
                <div class="text-sm text-gray-500">{texts.leagues}</div>
                <div class="text-2xl font-bold">{stats.leagues_count.to_string()}</div>
            </div>
            <div class="bg-white rounded-lg shadow p-4">
                <div class="text-sm text-gray-500">{texts.last_sync}</div>
                <div class="text-lg font-semibold">{last_sync}</div>
            </div>
            <div class="bg-white rounded-lg shadow p-4">
                <div class="text-sm text-gray-500">{texts.api_calls}</div>
                <div class="text-2xl font-bold">
                    {format!("{} / {}", stats.calls_made_today, stats.max_calls_per_day)}
                </div>
                <div class="w-full bg-gray-200 rounded h-2 mt-2">
                    <div class="bg-blue-600 h-2 rounded" style=format!("width: {}%;", usage)></div>
                </div>
                <div class="text-xs text-gray-500 mt-1">{format!("{}%", usage)}</div>
            </div>
        </div>
    }
}

/// Collapsible view of the rolling log buffer
#[component]
pub fn DiagnosticsPanel(locale: Locale) -> impl IntoView {
    let open = RwSignal::new(false);
    let logs = RwSignal::new(String::new());

    let toggle = move |_| {
        if !open.get_untracked() {
            logs.set(rolling_logger::read_logs().unwrap_or_else(|e| e));
        }
        open.update(|o| *o = !*o);
    };

    view! {
        <div class="mt-6">
            <button class="text-sm text-gray-600 underline" on:click=toggle>
                {move || messages::show_logs_label(locale, open.get())}
            </button>
            <Show when=move || open.get()>
                <pre class="mt-2 p-2 bg-gray-100 text-xs overflow-auto max-h-64">{move || logs.get()}</pre>
            </Show>
        </div>
    }
}

#[component]
pub fn AdminDashboard(config: AdminConfig, stats: DashboardStats) -> impl IntoView {
    let locale = config.locale;
    let show_diagnostics = config.show_diagnostics;
    let leagues_last_sync = stats
        .last_sync
        .as_deref()
        .map(|value| messages::last_sync_label(locale, value));
    let transport = FetchTransport::new(config);

    view! {
        <div class="max-w-4xl mx-auto p-6">
            <StatsSummary stats=stats locale=locale />
            <div class="grid grid-cols-2 gap-4">
                <SyncCard
                    action=SyncAction::Leagues
                    transport=transport.clone()
                    locale=locale
                    initial_last_sync=leagues_last_sync
                />
                <SyncCard
                    action=SyncAction::Matches
                    transport=transport
                    locale=locale
                    initial_last_sync=None
                />
            </div>
            {show_diagnostics.then(|| view! { <DiagnosticsPanel locale=locale /> })}
        </div>
    }
}

/// Set up logging from the page configuration and mount the dashboard on `<body>`
pub fn mount() {
    let (config, config_error) = commands::load_config();

    if let Err(e) = rolling_logger::init_logger("sync-admin", &config.log_filter, config.log_buffer_bytes) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "falling back to default configuration");
    }

    let stats = commands::load_stats();
    tracing::info!(locale = ?config.locale, base_url = %config.base_url, "mounting sync admin panel");

    leptos::mount::mount_to_body(move || view! { <AdminDashboard config=config stats=stats /> });
}
