//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::protected_route::ProtectedRoute;
use crate::pages::{auth::AuthPage, profile::ProfilePage};
use crate::state::{auth::AuthState, profile::ProfileState};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth and profile contexts, syncs the session with the stored
/// token once, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = AuthState::new();
    auth.store().initialize();
    auth.sync();

    provide_context(auth);
    provide_context(ProfileState::new());

    view! {
        <Stylesheet id="leptos" href="/pkg/learnhub.css"/>
        <Title text="LearnHub"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("auth") view=AuthPage/>
                <Route
                    path=StaticSegment("profile")
                    view=|| view! { <ProtectedRoute><ProfilePage/></ProtectedRoute> }
                />
                <Route path=StaticSegment("") view=|| view! { <Redirect path="/profile"/> }/>
            </Routes>
        </Router>
    }
}
