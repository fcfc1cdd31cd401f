/// Main application entry point for Morai reviews.
/// `/` shows the submission form next to the public list, `/admin` the
/// moderation list.
use leptos::logging::{error, log};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use crate::client;
use crate::components::{admin_panel::AdminPanel, review_form::ReviewForm, reviews_list::ReviewsList};
use crate::models::review::ReviewDraft;
use crate::models::review_list::ReviewList;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/morai.css" />
        <Title text="MORAI Reviews" />
        <Router>
            <main>
                <Routes>
                    <Route path="" view=ReviewsPage />
                    <Route path="/admin" view=AdminPage />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn ReviewsPage() -> impl IntoView {
    let reviews = create_rw_signal(ReviewList::default());
    let draft = create_rw_signal(ReviewDraft::default());
    let (submitting, set_submitting) = create_signal(false);

    create_effect(move |_| {
        spawn_local(async move {
            match client::fetch_reviews().await {
                Ok(items) => reviews.update(|list| list.replace(items)),
                Err(err) => log!("[PAGE] Could not load reviews: {}", err),
            }
        });
    });

    // The draft is only cleared once the server has accepted it
    let submit = Callback::new(move |_: ()| {
        let request = draft.get_untracked().to_new_review();
        set_submitting.set(true);
        spawn_local(async move {
            match client::submit_review(&request).await {
                Ok(saved) => {
                    reviews.update(|list| list.prepend(saved.into()));
                    draft.update(|d| d.clear());
                }
                Err(err) => {
                    error!("[PAGE] Unable to save review: {}", err);
                    let _ = window().alert_with_message("Unable to save review");
                }
            }
            set_submitting.set(false);
        });
    });

    let items = Signal::derive(move || reviews.with(|list| list.items().to_vec()));

    view! {
        <div class="reviews-page">
            <h1>{ "MORAI" }</h1>
            <ReviewForm draft=draft submitting=submitting on_submit=submit />
            <h3>{ "Recent Reviews" }</h3>
            <ReviewsList reviews=items />
        </div>
    }
}

#[component]
pub fn AdminPage() -> impl IntoView {
    view! {
        <div class="admin-page">
            <h2>{ "Admin - Reviews" }</h2>
            <AdminPanel />
        </div>
    }
}
