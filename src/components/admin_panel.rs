use leptos::logging::{error, log};
use leptos::*;
use crate::client;
use crate::components::reviews_list::ReviewsList;
use crate::models::review_list::ReviewList;

/// Review list with delete buttons. A delete hides the entry at once and puts
/// the previous list back if the server call fails.
#[component]
pub fn AdminPanel() -> impl IntoView {
    let reviews = create_rw_signal(ReviewList::default());
    let (loading, set_loading) = create_signal(true);

    create_effect(move |_| {
        spawn_local(async move {
            match client::fetch_reviews().await {
                Ok(items) => reviews.update(|list| list.replace(items)),
                Err(err) => log!("[ADMIN] Could not load reviews: {}", err),
            }
            set_loading.set(false);
        });
    });

    let remove = Callback::new(move |id: String| {
        let confirmed = window()
            .confirm_with_message("Delete this review?")
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let Some(pending) = reviews.try_update(|list| list.begin_removal(&id)) else {
            return;
        };
        spawn_local(async move {
            if let Err(err) = client::remove_review(pending.id()).await {
                error!("[ADMIN] Delete of {} failed: {}", pending.id(), err);
                reviews.update(|list| list.rollback(pending));
                let _ = window().alert_with_message("Delete failed");
            }
        });
    });

    let items = Signal::derive(move || reviews.with(|list| list.items().to_vec()));

    view! {
        <Show when=move || !loading.get() fallback=|| view! { <p>{ "Loading..." }</p> }>
            <ReviewsList reviews=items on_delete=remove />
        </Show>
    }
}
