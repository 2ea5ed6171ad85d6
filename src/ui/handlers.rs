//! Web UI handlers
//!
//! Every page is rendered the same way: gather data, build the dynamic row
//! strings, then drop them into the page template. Scripts are static and
//! read their inputs from data attributes.

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::auth::guard::{authorize, Access};
use crate::auth::middleware::{
    client_context_from_headers, resolve_session, session_id_from_headers, SESSION_COOKIE,
};
use crate::auth::models::{
    destination_for, visible_modules, Destination, LoginForm, NavModule, Role,
};
use crate::auth::session::SessionData;
use crate::portal::server::SharedState;
use crate::store::{Document, DocumentKind, Notification};

const LISTING_SCRIPT: &str = r#"
    <script>
        (function() {
            const searchInput = document.getElementById('search-input');
            const yearSelect = document.getElementById('year-select');
            const filterBtns = document.querySelectorAll('.filter-btn');
            const tbody = document.getElementById('documents-tbody');
            const emptyState = document.getElementById('empty-state');
            let currentKind = 'all';

            function filterTable() {
                const searchTerm = searchInput.value.toLowerCase();
                const year = yearSelect.value;
                const rows = tbody.querySelectorAll('tr');
                let visibleCount = 0;

                rows.forEach(row => {
                    let match = true;

                    if (searchTerm) {
                        const haystack = row.dataset.search || '';
                        match = haystack.includes(searchTerm);
                    }

                    if (match && currentKind !== 'all') {
                        match = (row.dataset.kind || '') === currentKind;
                    }

                    if (match && year !== 'all') {
                        match = (row.dataset.year || '') === year;
                    }

                    row.style.display = match ? '' : 'none';
                    if (match) visibleCount++;
                });

                emptyState.style.display = visibleCount === 0 ? 'block' : 'none';
            }

            searchInput.addEventListener('input', filterTable);
            yearSelect.addEventListener('change', filterTable);

            filterBtns.forEach(btn => {
                btn.addEventListener('click', () => {
                    filterBtns.forEach(b => b.classList.remove('bg-blue-900', 'text-white'));
                    btn.classList.add('bg-blue-900', 'text-white');
                    currentKind = btn.dataset.kind;
                    filterTable();
                });
            });

            filterBtns[0].classList.add('bg-blue-900', 'text-white');
            filterTable();
        })();
    </script>
"#;

const LOGIN_SCRIPT: &str = r#"
    <script>
        (function() {
            const toggle = document.getElementById('toggle-password');
            const password = document.getElementById('password');

            toggle.addEventListener('click', () => {
                const hidden = password.type === 'password';
                password.type = hidden ? 'text' : 'password';
                toggle.textContent = hidden ? 'Hide' : 'Show';
            });
        })();
    </script>
"#;

const DASHBOARD_SCRIPT: &str = r#"
    <script>
        (function() {
            const modal = document.getElementById('doc-modal');
            const closeBtn = document.getElementById('doc-modal-close');

            function openModal(doc) {
                document.getElementById('doc-modal-title').textContent = doc.title;
                document.getElementById('doc-modal-number').textContent = doc.number;
                document.getElementById('doc-modal-kind').textContent = doc.kind;
                document.getElementById('doc-modal-sponsor').textContent = doc.sponsor;
                document.getElementById('doc-modal-status').textContent = doc.status;
                document.getElementById('doc-modal-date').textContent = doc.session_date;
                document.getElementById('doc-modal-summary').textContent = doc.summary;
                modal.style.display = 'flex';
            }

            closeBtn.addEventListener('click', () => { modal.style.display = 'none'; });
            modal.addEventListener('click', (e) => {
                if (e.target === modal) modal.style.display = 'none';
            });

            document.querySelectorAll('.view-doc-btn').forEach(btn => {
                btn.addEventListener('click', () => {
                    fetch('/api/documents/info', {
                        method: 'POST',
                        headers: { 'Content-Type': 'application/json' },
                        body: JSON.stringify({ id: parseInt(btn.dataset.id, 10), type: btn.dataset.kind })
                    })
                    .then(r => r.json())
                    .then(data => {
                        if (data.success) {
                            openModal(data.document);
                        } else {
                            alert(data.error || 'Unable to load document');
                        }
                    });
                });
            });

            document.querySelectorAll('.mark-read-btn').forEach(btn => {
                btn.addEventListener('click', () => {
                    fetch('/api/notifications/read', {
                        method: 'POST',
                        headers: { 'Content-Type': 'application/json' },
                        body: JSON.stringify({ id: parseInt(btn.dataset.id, 10) })
                    })
                    .then(r => r.json())
                    .then(data => {
                        if (data.success) {
                            const item = btn.closest('.notification-item');
                            if (item) item.remove();
                        }
                    });
                });
            });
        })();
    </script>
"#;

// Public listing

/// Public page - lists all published ordinances and resolutions
pub async fn public_listing(State(state): State<SharedState>) -> Html<String> {
    // A store outage degrades to an empty listing rather than a blank error page
    let documents = match state.documents.list_published().await {
        Ok(documents) => documents,
        Err(e) => {
            tracing::error!("Published document listing failed: {}", e);
            Vec::new()
        }
    };

    let document_rows: String = documents
        .iter()
        .map(|d| {
            format!(
                r#"
                <tr class="border-b border-gray-200 hover:bg-gray-50" data-search="{}" data-kind="{}" data-year="{}">
                    <td class="px-4 py-3 font-mono text-sm">{}</td>
                    <td class="px-4 py-3">
                        <span class="inline-flex items-center px-2 py-1 rounded-full text-xs font-medium {}">{}</span>
                    </td>
                    <td class="px-4 py-3">{}</td>
                    <td class="px-4 py-3 text-sm">{}</td>
                    <td class="px-4 py-3 text-sm">{}</td>
                    <td class="px-4 py-3 text-sm">{}</td>
                </tr>
                "#,
                escape_html(&format!("{} {} {}", d.number, d.title, d.sponsor).to_lowercase()),
                d.kind.as_str(),
                d.session_date.format("%Y"),
                escape_html(&d.number),
                kind_badge_class(d.kind),
                d.kind.label(),
                escape_html(&d.title),
                escape_html(&d.sponsor),
                d.session_date.format("%B %d, %Y"),
                escape_html(&d.status),
            )
        })
        .collect();

    let mut years: Vec<String> = documents
        .iter()
        .map(|d| d.session_date.format("%Y").to_string())
        .collect();
    years.sort();
    years.dedup();
    years.reverse();

    let year_options: String = years
        .iter()
        .map(|y| format!(r#"<option value="{}">{}</option>"#, y, y))
        .collect();

    let html = format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100 text-gray-900 min-h-screen">
    <header class="bg-blue-950 text-white">
        <div class="container mx-auto px-6 py-5 flex items-center justify-between max-w-6xl">
            <div>
                <h1 class="text-2xl font-bold">{title}</h1>
                <p class="text-sm text-blue-200">{municipality}</p>
            </div>
            <a href="/login" class="px-4 py-2 bg-blue-800 hover:bg-blue-700 rounded text-sm font-medium">Member login</a>
        </div>
    </header>

    <main class="container mx-auto px-6 py-8 max-w-6xl">
        <header class="mb-6">
            <h2 class="text-xl font-semibold mb-1">Ordinances and Resolutions</h2>
            <p class="text-gray-500 text-sm">Published measures of the council - {count} on record</p>
        </header>

        <!-- Search and Filter -->
        <div class="mb-6 bg-white rounded-lg shadow p-4">
            <input
                type="text"
                id="search-input"
                placeholder="Search by number, title, or sponsor..."
                class="w-full px-4 py-2 border border-gray-300 rounded placeholder-gray-400 focus:outline-none focus:border-blue-900"
            />
            <div class="mt-3 flex items-center space-x-2">
                <button class="px-3 py-1 text-sm bg-gray-200 hover:bg-gray-300 rounded filter-btn" data-kind="all">All</button>
                <button class="px-3 py-1 text-sm bg-gray-200 hover:bg-gray-300 rounded filter-btn" data-kind="ordinance">Ordinances</button>
                <button class="px-3 py-1 text-sm bg-gray-200 hover:bg-gray-300 rounded filter-btn" data-kind="resolution">Resolutions</button>
                <select id="year-select" class="ml-auto px-3 py-1 text-sm border border-gray-300 rounded">
                    <option value="all">All years</option>
                    {year_options}
                </select>
            </div>
        </div>

        <!-- Documents Table -->
        <div class="bg-white rounded-lg overflow-hidden shadow">
            <table class="w-full">
                <thead class="bg-gray-50 border-b border-gray-200">
                    <tr>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Number</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Type</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Title</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Sponsor</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Session Date</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Status</th>
                    </tr>
                </thead>
                <tbody id="documents-tbody">
                    {rows}
                </tbody>
            </table>
        </div>

        <!-- Empty State -->
        <div id="empty-state" class="text-center py-12" style="display: none;">
            <p class="text-gray-400 text-lg">No documents match your search</p>
        </div>
    </main>
    {script}
</body>
</html>
        "#,
        title = escape_html(&state.config.portal.title),
        municipality = escape_html(&state.config.portal.municipality),
        count = documents.len(),
        year_options = year_options,
        rows = document_rows,
        script = LISTING_SCRIPT,
    );

    Html(html)
}

// Login

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    msg: Option<String>,
}

/// Known `?msg=` codes map to fixed notices; anything else renders nothing,
/// so query text never reaches the page.
fn notice_for(msg: Option<&str>) -> Option<&'static str> {
    match msg {
        Some("logged_out") => Some("You have been signed out."),
        _ => None,
    }
}

/// Login page. Already-authenticated sessions go straight to their dashboard.
pub async fn login_page(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<LoginPageQuery>,
) -> Response {
    if let Some(session) = resolve_session(&headers, &state.sessions).await {
        return Redirect::to(destination_for(Some(session.role)).path()).into_response();
    }

    Html(login_page_html(
        &state.config.portal.title,
        &state.config.portal.municipality,
        notice_for(query.msg.as_deref()),
        None,
        "",
    ))
    .into_response()
}

/// Login submission. Success sets the session cookie and redirects to the
/// role's dashboard; failure re-renders the form with one opaque message.
pub async fn submit_login(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let ctx = client_context_from_headers(&headers);

    match state
        .authenticator
        .authenticate(&form.email, &form.password, &ctx)
        .await
    {
        Ok(outcome) => {
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, outcome.session_id
            );
            (
                AppendHeaders([(SET_COOKIE, cookie)]),
                Redirect::to(outcome.destination.path()),
            )
                .into_response()
        }
        Err(e) => Html(login_page_html(
            &state.config.portal.title,
            &state.config.portal.municipality,
            None,
            Some(e.user_message()),
            &form.email,
        ))
        .into_response(),
    }
}

fn login_page_html(
    title: &str,
    municipality: &str,
    notice: Option<&str>,
    error: Option<&str>,
    email: &str,
) -> String {
    let notice_banner = match notice {
        Some(message) => format!(
            r#"<div class="mb-4 px-4 py-3 bg-green-50 border border-green-200 text-green-700 text-sm rounded">{}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    };
    let error_banner = match error {
        Some(message) => format!(
            r#"<div class="mb-4 px-4 py-3 bg-red-50 border border-red-200 text-red-700 text-sm rounded">{}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    };

    format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sign in | {title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100 min-h-screen flex items-center justify-center">
    <div class="w-full max-w-md px-4">
        <div class="text-center mb-8">
            <h1 class="text-2xl font-bold text-blue-950">{title}</h1>
            <p class="text-sm text-gray-500">{municipality}</p>
        </div>
        <div class="bg-white rounded-lg shadow p-8">
            <h2 class="text-lg font-semibold mb-6">Sign in</h2>
            {notice_banner}
            {error_banner}
            <form method="post" action="/login" class="space-y-4">
                <div>
                    <label for="email" class="block text-sm font-medium mb-1">Email</label>
                    <input type="email" id="email" name="email" value="{email}" required
                        class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:border-blue-900" />
                </div>
                <div>
                    <label for="password" class="block text-sm font-medium mb-1">Password</label>
                    <div class="relative">
                        <input type="password" id="password" name="password" required
                            class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:border-blue-900" />
                        <button type="button" id="toggle-password"
                            class="absolute inset-y-0 right-0 px-3 text-xs text-gray-500 hover:text-gray-700">Show</button>
                    </div>
                </div>
                <button type="submit"
                    class="w-full py-2 bg-blue-900 hover:bg-blue-800 text-white font-medium rounded">Sign in</button>
            </form>
            <p class="mt-6 text-xs text-gray-400 text-center">Access is limited to provisioned council accounts.</p>
        </div>
        <p class="text-center mt-6"><a href="/" class="text-sm text-blue-900 hover:underline">Back to public listing</a></p>
    </div>
    {script}
</body>
</html>
        "#,
        title = escape_html(title),
        municipality = escape_html(municipality),
        notice_banner = notice_banner,
        error_banner = error_banner,
        email = escape_html(email),
        script = LOGIN_SCRIPT,
    )
}

// Logout

/// Destroy the session and clear the cookie
pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.delete_session(&session_id).await;
    }

    let expired = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    (
        AppendHeaders([(SET_COOKIE, expired)]),
        Redirect::to("/login?msg=logged_out"),
    )
        .into_response()
}

// Role dashboards

pub async fn super_admin_dashboard(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Response {
    dashboard_for(state, headers, Destination::SuperAdminDashboard).await
}

pub async fn admin_dashboard(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    dashboard_for(state, headers, Destination::AdminDashboard).await
}

pub async fn councilor_dashboard(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Response {
    dashboard_for(state, headers, Destination::CouncilorDashboard).await
}

/// Shared dashboard flow: guard first, then gather data and render
async fn dashboard_for(
    state: SharedState,
    headers: HeaderMap,
    destination: Destination,
) -> Response {
    let session = resolve_session(&headers, &state.sessions).await;

    let session = match authorize(session.as_ref(), destination) {
        Access::Allow => match session {
            Some(session) => session,
            None => return Redirect::to(Destination::Login.path()).into_response(),
        },
        Access::Redirect(target) => return Redirect::to(target.path()).into_response(),
    };

    let recent = match state.documents.list_recent(10).await {
        Ok(documents) => documents,
        Err(e) => {
            tracing::error!("Recent document query failed: {}", e);
            Vec::new()
        }
    };
    let unread = match state.notifications.unread_for(session.user_id).await {
        Ok(notifications) => notifications,
        Err(e) => {
            tracing::error!("Notification query failed: {}", e);
            Vec::new()
        }
    };
    let active_accounts = if session.role == Role::SuperAdmin {
        state.users.count_active().await.ok()
    } else {
        None
    };

    Html(dashboard_html(
        &state.config.portal.title,
        &state.config.portal.municipality,
        &session,
        &recent,
        &unread,
        active_accounts,
    ))
    .into_response()
}

fn dashboard_html(
    title: &str,
    municipality: &str,
    session: &SessionData,
    recent: &[Document],
    unread: &[Notification],
    active_accounts: Option<i64>,
) -> String {
    let sidebar: String = visible_modules(session.role)
        .into_iter()
        .map(|module| {
            format!(
                r##"<a href="#{}" class="block px-4 py-2 rounded hover:bg-blue-900 font-medium">{}</a>"##,
                module.anchor(),
                module.label()
            )
        })
        .collect();

    let sections: String = visible_modules(session.role)
        .into_iter()
        .map(|module| section_html(module, session, recent, unread, active_accounts))
        .collect();

    format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{label} | {title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100 text-gray-900 min-h-screen">
    <div class="flex h-screen">
        <!-- Sidebar Navigation -->
        <div class="w-64 bg-blue-950 text-blue-100 overflow-y-auto">
            <div class="p-6">
                <h1 class="text-xl font-bold mb-1">{title}</h1>
                <p class="text-xs text-blue-300 mb-8">{municipality}</p>
                <nav class="space-y-2">
                    {sidebar}
                </nav>
            </div>
        </div>

        <!-- Main Content -->
        <div class="flex-1 overflow-auto">
            <header class="bg-white border-b border-gray-200 px-8 py-4 flex items-center justify-between">
                <div>
                    <h2 class="text-lg font-semibold">{label}</h2>
                    <p class="text-sm text-gray-500">Welcome, {name}</p>
                </div>
                <div class="flex items-center space-x-4">
                    {badge}
                    <form method="post" action="/logout">
                        <button type="submit" class="px-3 py-1 text-sm bg-blue-900 hover:bg-blue-800 text-white rounded">Sign out</button>
                    </form>
                </div>
            </header>
            <main class="px-8 py-8 max-w-6xl">
                {sections}
            </main>
        </div>
    </div>
    {modal}
    {script}
</body>
</html>
        "#,
        label = dashboard_label(session.role),
        title = escape_html(title),
        municipality = escape_html(municipality),
        name = escape_html(&session.name),
        badge = role_badge(session.role),
        sidebar = sidebar,
        sections = sections,
        modal = DOC_MODAL,
        script = DASHBOARD_SCRIPT,
    )
}

const DOC_MODAL: &str = r#"
    <div id="doc-modal" style="display: none;" class="fixed inset-0 bg-black bg-opacity-50 items-center justify-center p-4">
        <div class="bg-white rounded-lg shadow-xl max-w-lg w-full p-6">
            <div class="flex items-start justify-between mb-4">
                <h3 id="doc-modal-title" class="text-lg font-semibold pr-4"></h3>
                <button id="doc-modal-close" class="text-gray-400 hover:text-gray-600 text-xl leading-none">&times;</button>
            </div>
            <dl class="space-y-2 text-sm">
                <div><dt class="font-medium inline">Number:</dt> <dd id="doc-modal-number" class="inline font-mono"></dd></div>
                <div><dt class="font-medium inline">Type:</dt> <dd id="doc-modal-kind" class="inline capitalize"></dd></div>
                <div><dt class="font-medium inline">Sponsor:</dt> <dd id="doc-modal-sponsor" class="inline"></dd></div>
                <div><dt class="font-medium inline">Status:</dt> <dd id="doc-modal-status" class="inline"></dd></div>
                <div><dt class="font-medium inline">Session date:</dt> <dd id="doc-modal-date" class="inline"></dd></div>
            </dl>
            <p id="doc-modal-summary" class="mt-4 text-sm text-gray-600"></p>
        </div>
    </div>
"#;

fn section_html(
    module: NavModule,
    session: &SessionData,
    recent: &[Document],
    unread: &[Notification],
    active_accounts: Option<i64>,
) -> String {
    match module {
        NavModule::Dashboard => overview_section(session, recent, unread),
        NavModule::Creation => creation_section(),
        NavModule::Classification => classification_section(recent),
        NavModule::Reports => reports_section(recent),
        NavModule::Accounts => accounts_section(active_accounts),
    }
}

fn overview_section(
    session: &SessionData,
    recent: &[Document],
    unread: &[Notification],
) -> String {
    format!(
        r#"
        <section id="overview" class="mb-10">
            <h3 class="text-xl font-semibold mb-4">Overview</h3>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4 mb-6">
                {unread_card}
                {recent_card}
                {department_card}
            </div>
            <div class="bg-white rounded-lg shadow p-6 mb-6">
                <h4 class="font-semibold mb-3">Notifications</h4>
                <div class="space-y-2">
                    {notifications}
                </div>
            </div>
            <div class="bg-white rounded-lg shadow overflow-hidden">
                <div class="px-6 py-4 border-b border-gray-200">
                    <h4 class="font-semibold">Recent documents</h4>
                </div>
                <table class="w-full">
                    <thead class="bg-gray-50">
                        <tr>
                            <th class="px-4 py-3 text-left text-sm font-semibold">Number</th>
                            <th class="px-4 py-3 text-left text-sm font-semibold">Type</th>
                            <th class="px-4 py-3 text-left text-sm font-semibold">Title</th>
                            <th class="px-4 py-3 text-left text-sm font-semibold">Status</th>
                            <th class="px-4 py-3"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows}
                    </tbody>
                </table>
            </div>
        </section>
        "#,
        unread_card = stat_card(
            "Unread notifications",
            &unread.len().to_string(),
            "text-3xl font-bold text-amber-600"
        ),
        recent_card = stat_card(
            "Recent documents",
            &recent.len().to_string(),
            "text-3xl font-bold text-blue-900"
        ),
        department_card = stat_card(
            "Department",
            &escape_html(&session.department),
            "text-xl font-semibold text-gray-800"
        ),
        notifications = notification_items(unread),
        rows = recent_document_rows(recent),
    )
}

fn creation_section() -> String {
    r##"
        <section id="creation" class="mb-10">
            <h3 class="text-xl font-semibold mb-4">Document Creation</h3>
            <div class="bg-white rounded-lg shadow p-6">
                <p class="text-sm text-gray-600 mb-4">Draft a new measure for endorsement to the secretariat. Drafts are numbered by the records office once calendared.</p>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <a href="#creation" class="block border border-gray-200 rounded-lg p-4 hover:border-blue-900 hover:shadow">
                        <p class="font-semibold mb-1">Ordinance draft</p>
                        <p class="text-sm text-gray-500">Regulatory measure with penal or budgetary effect</p>
                    </a>
                    <a href="#creation" class="block border border-gray-200 rounded-lg p-4 hover:border-blue-900 hover:shadow">
                        <p class="font-semibold mb-1">Resolution draft</p>
                        <p class="text-sm text-gray-500">Expression of sentiment or administrative directive</p>
                    </a>
                </div>
            </div>
        </section>
    "##
    .to_string()
}

fn classification_section(recent: &[Document]) -> String {
    let pending_rows: String = recent
        .iter()
        .filter(|d| !d.published)
        .map(|d| {
            format!(
                r#"
                <tr class="border-b border-gray-200">
                    <td class="px-4 py-3 font-mono text-sm">{}</td>
                    <td class="px-4 py-3">{}</td>
                    <td class="px-4 py-3">{}</td>
                    <td class="px-4 py-3 text-sm">{}</td>
                </tr>
                "#,
                escape_html(&d.number),
                d.kind.label(),
                escape_html(&d.title),
                escape_html(&d.status),
            )
        })
        .collect();

    let body = if pending_rows.is_empty() {
        r#"<p class="px-6 py-4 text-sm text-gray-500">No documents awaiting classification</p>"#
            .to_string()
    } else {
        format!(
            r#"
            <table class="w-full">
                <thead class="bg-gray-50">
                    <tr>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Number</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Type</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Title</th>
                        <th class="px-4 py-3 text-left text-sm font-semibold">Status</th>
                    </tr>
                </thead>
                <tbody>
                    {}
                </tbody>
            </table>
            "#,
            pending_rows
        )
    };

    format!(
        r#"
        <section id="classification" class="mb-10">
            <h3 class="text-xl font-semibold mb-4">Classification</h3>
            <div class="bg-white rounded-lg shadow overflow-hidden">
                <div class="px-6 py-4 border-b border-gray-200">
                    <h4 class="font-semibold">Awaiting publication</h4>
                </div>
                {}
            </div>
        </section>
        "#,
        body
    )
}

fn reports_section(recent: &[Document]) -> String {
    let ordinances = recent
        .iter()
        .filter(|d| d.kind == DocumentKind::Ordinance)
        .count();
    let resolutions = recent
        .iter()
        .filter(|d| d.kind == DocumentKind::Resolution)
        .count();
    let published = recent.iter().filter(|d| d.published).count();

    format!(
        r#"
        <section id="reports" class="mb-10">
            <h3 class="text-xl font-semibold mb-4">Reports</h3>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                {}
                {}
                {}
            </div>
            <p class="mt-3 text-xs text-gray-400">Figures cover the most recent documents on file.</p>
        </section>
        "#,
        stat_card(
            "Ordinances",
            &ordinances.to_string(),
            "text-3xl font-bold text-blue-900"
        ),
        stat_card(
            "Resolutions",
            &resolutions.to_string(),
            "text-3xl font-bold text-emerald-700"
        ),
        stat_card(
            "Published",
            &published.to_string(),
            "text-3xl font-bold text-gray-800"
        ),
    )
}

fn accounts_section(active_accounts: Option<i64>) -> String {
    let value = active_accounts
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        r#"
        <section id="accounts" class="mb-10">
            <h3 class="text-xl font-semibold mb-4">Accounts</h3>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                {}
            </div>
            <p class="mt-3 text-xs text-gray-400">Accounts are provisioned and deactivated by the records office.</p>
        </section>
        "#,
        stat_card(
            "Active accounts",
            &value,
            "text-3xl font-bold text-purple-800"
        ),
    )
}

fn recent_document_rows(recent: &[Document]) -> String {
    if recent.is_empty() {
        return r#"<tr><td colspan="5" class="px-4 py-6 text-center text-sm text-gray-500">No documents on file</td></tr>"#.to_string();
    }

    recent
        .iter()
        .map(|d| {
            format!(
                r#"
                <tr class="border-b border-gray-200 hover:bg-gray-50">
                    <td class="px-4 py-3 font-mono text-sm">{}</td>
                    <td class="px-4 py-3">{}</td>
                    <td class="px-4 py-3">{}</td>
                    <td class="px-4 py-3 text-sm">{}</td>
                    <td class="px-4 py-3 text-right">
                        <button class="view-doc-btn px-3 py-1 text-xs bg-gray-700 hover:bg-gray-800 text-white rounded" data-id="{}" data-kind="{}">View</button>
                    </td>
                </tr>
                "#,
                escape_html(&d.number),
                d.kind.label(),
                escape_html(&d.title),
                escape_html(&d.status),
                d.id,
                d.kind.as_str(),
            )
        })
        .collect()
}

fn notification_items(unread: &[Notification]) -> String {
    if unread.is_empty() {
        return r#"<p class="text-gray-500 text-sm">No unread notifications</p>"#.to_string();
    }

    unread
        .iter()
        .map(|n| {
            format!(
                r#"
                <div class="flex items-center justify-between bg-amber-50 border border-amber-200 rounded px-4 py-3 notification-item">
                    <div>
                        <p class="text-sm">{}</p>
                        <p class="text-xs text-gray-500">{}</p>
                    </div>
                    <button class="mark-read-btn px-3 py-1 text-xs bg-blue-600 hover:bg-blue-700 text-white rounded" data-id="{}">Mark read</button>
                </div>
                "#,
                escape_html(&n.message),
                n.created_at.format("%Y-%m-%d %H:%M"),
                n.id,
            )
        })
        .collect()
}

fn stat_card(label: &str, value: &str, value_class: &str) -> String {
    format!(
        r#"
        <div class="bg-white rounded-lg shadow p-6">
            <p class="text-sm text-gray-500 mb-1">{}</p>
            <p class="{}">{}</p>
        </div>
        "#,
        label, value_class, value
    )
}

fn dashboard_label(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "Super Admin Dashboard",
        Role::Admin => "Admin Dashboard",
        Role::Councilor => "Councilor Dashboard",
    }
}

fn role_badge(role: Role) -> String {
    let (class, label) = match role {
        Role::SuperAdmin => ("bg-purple-100 text-purple-800", "Super Admin"),
        Role::Admin => ("bg-blue-100 text-blue-800", "Admin"),
        Role::Councilor => ("bg-emerald-100 text-emerald-800", "Councilor"),
    };
    format!(
        r#"<span class="inline-flex items-center px-2 py-1 rounded-full text-xs font-medium {}">{}</span>"#,
        class, label
    )
}

fn kind_badge_class(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Ordinance => "bg-blue-100 text-blue-800",
        DocumentKind::Resolution => "bg-emerald-100 text-emerald-800",
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
