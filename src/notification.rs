use anyhow::Error;

/// Collaborateur de notification : informé de l'issue des soumissions.
/// Le cœur ne met pas en forme de message utilisateur au-delà de ça.
pub trait OutcomeNotifier {
    fn submitted(&self, summary: &str);
    fn failed(&self, summary: &str, err: &Error);
}

/// Sortie texte simple (console), suffisante pour la CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotifier;

impl OutcomeNotifier for TextNotifier {
    fn submitted(&self, summary: &str) {
        println!("OK: {summary}");
    }

    fn failed(&self, summary: &str, err: &Error) {
        eprintln!("Error: {summary}: {err}");
    }
}

/// Notifieur muet pour les tests et les appels en masse.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl OutcomeNotifier for SilentNotifier {
    fn submitted(&self, _summary: &str) {}
    fn failed(&self, _summary: &str, _err: &Error) {}
}
