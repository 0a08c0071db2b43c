//! Event inquiry command.

use doceria_client::api::types::ContatoCreate;
use doceria_client::state::AppState;

use crate::ContatoArgs;

pub async fn send(state: &AppState, args: ContatoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let contato = ContatoCreate {
        name: args.name,
        email: args.email.into_inner(),
        phone: args.phone,
        guest_count: args.people,
        event_kind: args.event,
        date: args.date,
        venue: args.venue,
        notes: args.notes,
    };

    let created = state.api().send_contato(&contato).await?;
    tracing::info!(
        "Contato {} enviado - retornaremos para {}",
        created.id,
        created.email
    );
    Ok(())
}
