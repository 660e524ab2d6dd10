use std::io::{
    BufRead,
    Write,
};

use crate::core::{
    extractor::MATURE_INTERVAL_DAYS,
    Collection,
    Deck,
    ExportError,
    ExportRequest,
};

enum Choice {
    Index(usize),
    Default,
    Cancelled,
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>, ExportError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Keeps asking until the user picks a listed number, accepts the default
/// (empty input, where allowed), or cancels with `q`/end of input.
fn prompt_choice<R, W>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    max: usize,
    allow_default: bool,
) -> Result<Choice, ExportError>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(Choice::Cancelled);
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(Choice::Cancelled);
        }
        if line.is_empty() && allow_default {
            return Ok(Choice::Default);
        }

        match line.parse::<usize>() {
            Ok(number) if (1..=max).contains(&number) => return Ok(Choice::Index(number - 1)),
            _ => {
                writeln!(output, "Please enter a number between 1 and {max}, or q to cancel.")?;
            }
        }
    }
}

/// Walks the user through the three decisions of a run: deck, export mode,
/// field mapping. `None` means the user cancelled; the workflow ends without
/// touching anything.
pub fn run_wizard<C, R, W>(
    collection: &C,
    input: &mut R,
    output: &mut W,
) -> Result<Option<ExportRequest>, ExportError>
where
    C: Collection,
    R: BufRead,
    W: Write,
{
    let Some(deck) = select_deck(collection, input, output)? else {
        return Ok(None);
    };
    let Some(words_only) = select_mode(input, output)? else {
        return Ok(None);
    };
    let Some((word_field, sentence_field)) =
        select_fields(collection, &deck, words_only, input, output)?
    else {
        return Ok(None);
    };

    Ok(Some(ExportRequest { deck_name: deck.name, words_only, word_field, sentence_field }))
}

fn select_deck<C, R, W>(
    collection: &C,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Deck>, ExportError>
where
    C: Collection,
    R: BufRead,
    W: Write,
{
    let decks = collection.decks()?;
    if decks.is_empty() {
        return Err(ExportError::NoDecksAvailable);
    }

    writeln!(output, "Select a deck to export known words from:")?;
    for (index, deck) in decks.iter().enumerate() {
        let card_count = collection.deck_card_ids(&deck.name)?.len();
        writeln!(output, "  {}) {} ({} cards)", index + 1, deck.name, card_count)?;
    }

    let chosen = match prompt_choice(input, output, "Deck (q to cancel): ", decks.len(), false)? {
        Choice::Index(index) => decks[index].clone(),
        Choice::Default | Choice::Cancelled => return Ok(None),
    };

    // The collection may have changed between listing and selection.
    let current = collection.decks()?;
    if !current.iter().any(|deck| deck.name == chosen.name) {
        return Err(ExportError::DeckNotFound(chosen.name));
    }
    let card_count = collection.deck_card_ids(&chosen.name)?.len();
    if card_count == 0 {
        return Err(ExportError::DeckHasNoCards(chosen.name));
    }

    writeln!(output, "Selected \"{}\" ({} cards).\n", chosen.name, card_count)?;
    Ok(Some(chosen))
}

fn select_mode<R, W>(input: &mut R, output: &mut W) -> Result<Option<bool>, ExportError>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Choose what to export from mature cards:")?;
    writeln!(output, "  1) Words only")?;
    writeln!(output, "  2) Words and sentences")?;
    writeln!(
        output,
        "Note: only cards with intervals of {MATURE_INTERVAL_DAYS}+ days count as mature."
    )?;

    let words_only = match prompt_choice(input, output, "Export mode [1]: ", 2, true)? {
        Choice::Index(index) => index == 0,
        Choice::Default => true,
        Choice::Cancelled => return Ok(None),
    };
    writeln!(output)?;
    Ok(Some(words_only))
}

fn select_fields<C, R, W>(
    collection: &C,
    deck: &Deck,
    words_only: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Option<(String, Option<String>)>, ExportError>
where
    C: Collection,
    R: BufRead,
    W: Write,
{
    let field_names = collection.field_names(&deck.name)?;
    if field_names.is_empty() {
        return Err(ExportError::NoFieldsFound(deck.name.clone()));
    }

    writeln!(output, "Select which fields contain the words and sentences:")?;
    for (index, name) in field_names.iter().enumerate() {
        writeln!(output, "  {}) {}", index + 1, name)?;
    }

    let word_field =
        match prompt_choice(input, output, "Word field (q to cancel): ", field_names.len(), false)?
        {
            Choice::Index(index) => field_names[index].clone(),
            Choice::Default | Choice::Cancelled => return Ok(None),
        };

    let sentence_field = if words_only {
        None
    } else {
        let prompt = "Sentence field (q to cancel): ";
        match prompt_choice(input, output, prompt, field_names.len(), false)? {
            Choice::Index(index) => Some(field_names[index].clone()),
            Choice::Default | Choice::Cancelled => return Ok(None),
        }
    };

    // Same staleness concern as with decks: make sure the chosen names are
    // still part of the note type before handing them onward.
    let current = collection.field_names(&deck.name)?;
    if !current.contains(&word_field) {
        return Err(ExportError::FieldNotFound(word_field));
    }
    if let Some(sentence) = &sentence_field {
        if !current.contains(sentence) {
            return Err(ExportError::FieldNotFound(sentence.clone()));
        }
    }

    Ok(Some((word_field, sentence_field)))
}
