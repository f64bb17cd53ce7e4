pub mod certificates;
pub mod courses;
pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod people;
pub mod person_editor;
pub mod settings;
pub mod tessere;

use crate::auth::use_auth;
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{
    LdBookOpen, LdCreditCard, LdLayoutDashboard, LdLogOut, LdSettings, LdShield, LdUsers,
};
use dioxus_free_icons::Icon;
use shared_ui::{
    use_toast, Button, ButtonVariant, Sidebar, SidebarContent, SidebarFooter, SidebarHeader,
    SidebarInset, SidebarMenuItem, SidebarProvider, SidebarTrigger, ToastOptions,
};

use certificates::Certificates;
use courses::Courses;
use dashboard::Dashboard;
use login::Login;
use not_found::NotFound;
use people::People;
use settings::Settings;
use tessere::Tessere;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/login")]
    Login {},
    #[redirect("/", || Route::Dashboard {})]
    #[layout(AuthGuard)]
    #[layout(AppLayout)]
    #[route("/dashboard")]
    Dashboard {},
    #[route("/people")]
    People {},
    #[route("/courses")]
    Courses {},
    #[route("/tessere")]
    Tessere {},
    #[route("/certificates")]
    Certificates {},
    #[route("/settings")]
    Settings {},
    #[end_layout]
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

impl Route {
    /// Title shown in the top bar.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login {} => "Accesso",
            Route::Dashboard {} => "Dashboard",
            Route::People {} => "Soci",
            Route::Courses {} => "Corsi",
            Route::Tessere {} => "Tessere",
            Route::Certificates {} => "Certificati",
            Route::Settings {} => "Impostazioni",
            Route::NotFound { .. } => "",
        }
    }
}

/// Sidebar entries in display order.
fn nav() -> [(&'static str, Route); 6] {
    [
        ("Dashboard", Route::Dashboard {}),
        ("Soci", Route::People {}),
        ("Tessere", Route::Tessere {}),
        ("Certificati", Route::Certificates {}),
        ("Corsi", Route::Courses {}),
        ("Impostazioni", Route::Settings {}),
    ]
}

/// Sends visitors without a session to the login page.
///
/// Suspends on the server future so SSR waits for the session check; the
/// `SuspenseBoundary` in `App` shows the loading text meanwhile.
#[component]
fn AuthGuard() -> Element {
    let mut auth = use_auth();

    let resource = use_server_future(move || async move { server::api::get_current_user().await })?;
    let result = resource.read().as_ref().cloned();

    match result {
        Some(Ok(Some(user))) => {
            if !auth.is_authenticated() {
                auth.set_user(user);
            }
            rsx! { Outlet::<Route> {} }
        }
        Some(Ok(None)) | Some(Err(_)) => {
            auth.clear_auth();
            navigator().replace(Route::Login {});
            rsx! {
                div { class: "auth-guard-loading",
                    p { "Reindirizzamento al login…" }
                }
            }
        }
        None => rsx! {
            div { class: "auth-guard-loading",
                p { "Carico…" }
            }
        },
    }
}

/// Sidebar plus top bar around every signed-in page.
#[component]
fn AppLayout() -> Element {
    let route: Route = use_route();
    let mut auth = use_auth();
    let toast = use_toast();

    let handle_logout = move |_| {
        spawn(async move {
            match server::api::logout().await {
                Ok(()) => toast.success("Logout effettuato".to_string(), ToastOptions::new()),
                Err(e) => {
                    tracing::warn!(error = %e, "logout failed");
                    toast.error(
                        shared_types::AppError::friendly_message(&e.to_string()),
                        ToastOptions::new(),
                    );
                }
            }
            auth.clear_auth();
            navigator().replace(Route::Login {});
        });
    };

    let email = auth
        .current_user
        .read()
        .as_ref()
        .map(|u| u.email.clone())
        .unwrap_or_default();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./layout.css") }

        SidebarProvider { default_open: false,
            Sidebar {
                SidebarHeader { title: "TopDanceAcademy", subtitle: "Gestione Database" }
                SidebarContent {
                    for (label, target) in nav() {
                        SidebarMenuItem { key: "{label}", active: route == target,
                            Link { class: "sidebar-link", to: target.clone(),
                                NavIcon { route: target }
                                span { "{label}" }
                            }
                        }
                    }
                }
                SidebarFooter {
                    if !email.is_empty() {
                        div { class: "sidebar-user", "{email}" }
                    }
                    Button { variant: ButtonVariant::Ghost, onclick: handle_logout,
                        Icon { icon: LdLogOut, width: 16, height: 16 }
                        "Esci"
                    }
                }
            }
            SidebarInset {
                header { class: "topbar",
                    SidebarTrigger {}
                    h1 { class: "topbar-title", "{route.title()}" }
                }
                main { class: "content",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

#[component]
fn NavIcon(route: Route) -> Element {
    match route {
        Route::Dashboard {} => rsx! { Icon { icon: LdLayoutDashboard, width: 18, height: 18 } },
        Route::People {} => rsx! { Icon { icon: LdUsers, width: 18, height: 18 } },
        Route::Tessere {} => rsx! { Icon { icon: LdCreditCard, width: 18, height: 18 } },
        Route::Certificates {} => rsx! { Icon { icon: LdShield, width: 18, height: 18 } },
        Route::Courses {} => rsx! { Icon { icon: LdBookOpen, width: 18, height: 18 } },
        Route::Settings {} => rsx! { Icon { icon: LdSettings, width: 18, height: 18 } },
        _ => rsx! {},
    }
}
