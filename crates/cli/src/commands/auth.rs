//! Session commands.

use doceria_client::state::AppState;

pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = state.auth().login(state.api(), email, password).await?;

    match user {
        Some(user) => tracing::info!("Olá, {}! Login efetuado.", user.name),
        None => tracing::info!("Login efetuado."),
    }
    Ok(())
}

pub fn logout(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    state.logout()?;
    tracing::info!("Você saiu da sua conta.");
    Ok(())
}

pub async fn register(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = state
        .auth()
        .register(state.api(), name, email, password)
        .await?;
    tracing::info!("{}", response.message);
    tracing::info!("Agora faça login: doceria auth login -e {email}");
    Ok(())
}

pub fn whoami(state: &AppState) {
    if !state.auth().is_authenticated() {
        tracing::info!("Você não está logado.");
        return;
    }

    match state.auth().user() {
        Some(user) => {
            tracing::info!("Logado como {} <{}>", user.name, user.email);
        }
        None => tracing::info!("Sessão ativa, mas sem dados de usuário."),
    }
}

pub async fn change_password(
    state: &AppState,
    current: &str,
    new: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = state
        .auth()
        .change_password(state.api(), current, new)
        .await?;
    tracing::info!("{}", response.message);
    Ok(())
}
