//! Persona and per-stage instruction text sent to the model.
//!
//! The persona stays fixed for the whole conversation; the instruction is
//! the one piece that changes per stage, so the model advances the flow
//! instead of free-running from a monolithic prompt.

use super::classify::Category;
use super::stage::Stage;

/// Fixed persona description, prepended to every completion request.
pub const PERSONA: &str = "\
Você é Suelen, assistente virtual do fotógrafo Jonatas Teixeira (Sua Essência Fotografia).
Seu papel é receber clientes pelo WhatsApp de forma acolhedora, simpática e natural.

Regras:
- Nunca repita saudações ou respostas genéricas como \"OK\".
- Use emojis quando fizer sentido.
- Seja humana, simpática e direta.
- Faça apenas uma pergunta por mensagem.
- Responda apenas o que a instrução da etapa atual pede.";

const WOMEN_PORTFOLIO: &str = "\
- https://suaessenciafotografia.pixieset.com/letciapache/
- https://suaessenciafotografia.pixieset.com/marliacatalano/
- https://suaessenciafotografia.pixieset.com/aylapacheli/";

const MEN_PORTFOLIO: &str = "\
- https://suaessenciafotografia.pixieset.com/talesgabbi/
- https://suaessenciafotografia.pixieset.com/dredsonuramoto/
- https://suaessenciafotografia.pixieset.com/drwilliamschwarzer/";

/// Instruction text for a stage, branching on the client category where the
/// stage calls for it.
pub fn instruction(stage: Stage, category: Category) -> String {
    match stage {
        Stage::Greeting => "Apresente-se uma única vez: \"Oi! Eu sou a Suelen, assistente do \
                            Jonatas 😊\". Não faça mais nada nesta mensagem além de se apresentar \
                            e se colocar à disposição."
            .to_string(),
        Stage::Qualify => "Pergunte sobre a área de atuação e o objetivo do cliente com as \
                           fotos: \"Me conta um pouco sobre sua área de atuação e seu objetivo \
                           com as fotos 🎯\"."
            .to_string(),
        Stage::Showcase => showcase_instruction(category),
        Stage::Schedule => "Pergunte de forma simpática se há alguma data prevista para a \
                            sessão 📅."
            .to_string(),
        Stage::Close => "Finalize informando que o Jonatas enviará um orçamento personalizado ✨ \
                         e agradeça pelo contato."
            .to_string(),
    }
}

fn showcase_instruction(category: Category) -> String {
    match category {
        Category::Woman => format!(
            "Compartilhe o portfólio feminino e diga que são trabalhos recentes:\n{WOMEN_PORTFOLIO}"
        ),
        Category::Man => format!(
            "Compartilhe o portfólio masculino e diga que são trabalhos recentes:\n{MEN_PORTFOLIO}"
        ),
        // Never guess: ask, and offer both sets so the client can self-select.
        Category::Unknown => format!(
            "Pergunte educadamente como o cliente gostaria de ser tratado(a) e compartilhe os \
             dois portfólios para que escolha o estilo mais próximo:\n\
             Ensaios femininos:\n{WOMEN_PORTFOLIO}\nEnsaios masculinos:\n{MEN_PORTFOLIO}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_branches_on_category() {
        let woman = instruction(Stage::Showcase, Category::Woman);
        let man = instruction(Stage::Showcase, Category::Man);
        assert!(woman.contains("letciapache"));
        assert!(!woman.contains("talesgabbi"));
        assert!(man.contains("talesgabbi"));
        assert!(!man.contains("letciapache"));
    }

    #[test]
    fn showcase_unknown_asks_and_offers_both() {
        let unknown = instruction(Stage::Showcase, Category::Unknown);
        assert!(unknown.contains("Pergunte"));
        assert!(unknown.contains("letciapache"));
        assert!(unknown.contains("talesgabbi"));
    }

    #[test]
    fn non_showcase_stages_ignore_category() {
        for stage in [Stage::Greeting, Stage::Qualify, Stage::Schedule, Stage::Close] {
            assert_eq!(
                instruction(stage, Category::Woman),
                instruction(stage, Category::Man)
            );
        }
    }
}
