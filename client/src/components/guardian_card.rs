//! Read-only card for one legal guardian in the profile editor.

#[cfg(test)]
#[path = "guardian_card_test.rs"]
mod guardian_card_test;

use leptos::prelude::*;
use session::types::{LegalGuardian, Relationship};

/// Human label for a guardian relationship.
pub fn relationship_label(relationship: Relationship) -> &'static str {
    match relationship {
        Relationship::Parent => "Parent",
        Relationship::LegalGuardian => "Legal guardian",
        Relationship::Grandparent => "Grandparent",
        Relationship::Uncle => "Uncle",
        Relationship::Aunt => "Aunt",
        Relationship::Sibling => "Sibling",
        Relationship::Other => "Other",
    }
}

#[component]
pub fn GuardianCard(guardian: LegalGuardian, on_remove: Callback<()>) -> impl IntoView {
    let name = format!("{} {}", guardian.firstname, guardian.lastname);
    let relationship = relationship_label(guardian.relationship);
    let address = (!guardian.address.is_empty()).then(|| guardian.address.clone());
    view! {
        <div class="guardian-card">
            <div class="guardian-card__header">
                <strong>{name}</strong>
                <span class="guardian-card__badge">{relationship}</span>
                <button class="guardian-card__remove" type="button" on:click=move |_| on_remove.run(())>
                    "Remove"
                </button>
            </div>
            <p>{guardian.email}</p>
            <p>{guardian.phone}</p>
            {address.map(|address| view! { <p>{address}</p> })}
        </div>
    }
}
