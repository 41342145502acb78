//! Suffix-rule lemmatization for lowercase English tokens.
//!
//! Inflected forms are reduced with ordered detachment rules plus tables of
//! irregular forms. A dictionary-validated lemmatizer would check every
//! candidate against a full lexicon; the rules here carry minimum stem
//! lengths instead, which keeps short words ("need", "bus", "yes") intact
//! while still mapping regular plurals and verb inflections to their base
//! form. Identity entries pin words a rule would otherwise mangle.

/// Part of speech a token is lemmatized as.
///
/// Tokens are reduced noun-first and the result verb-second, so "bottles"
/// becomes "bottle" and "flooding" becomes "flood".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    Verb,
}

/// Irregular noun forms, plus identity entries for words the plural rules
/// would otherwise damage.
pub(super) const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("lives", "life"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("calves", "calf"),
    ("leaves", "leaf"),
    ("hooves", "hoof"),
    ("elves", "elf"),
    ("firemen", "fireman"),
    ("policemen", "policeman"),
    ("fishermen", "fisherman"),
    ("gentlemen", "gentleman"),
    ("businessmen", "businessman"),
    ("spokesmen", "spokesman"),
    ("ashes", "ash"),
    ("buses", "bus"),
    ("gases", "gas"),
    ("viruses", "virus"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("sometimes", "sometimes"),
    ("besides", "besides"),
    ("goes", "goes"),
];

/// Irregular verb forms. Includes e-final stems whose inflections cannot be
/// recovered by suffix detachment ("making", "caused"), and identity entries
/// for -ing/-ed words that are not verb inflections at all ("morning").
pub(super) const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("went", "go"),
    ("gone", "go"),
    ("goes", "go"),
    ("going", "go"),
    ("ran", "run"),
    ("said", "say"),
    ("made", "make"),
    ("making", "make"),
    ("got", "get"),
    ("took", "take"),
    ("taking", "take"),
    ("came", "come"),
    ("coming", "come"),
    ("gave", "give"),
    ("giving", "give"),
    ("found", "find"),
    ("told", "tell"),
    ("left", "leave"),
    ("leaving", "leave"),
    ("felt", "feel"),
    ("kept", "keep"),
    ("held", "hold"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("thought", "think"),
    ("sent", "send"),
    ("built", "build"),
    ("lost", "lose"),
    ("losing", "lose"),
    ("meant", "mean"),
    ("met", "meet"),
    ("paid", "pay"),
    ("sat", "sit"),
    ("spoke", "speak"),
    ("stood", "stand"),
    ("wrote", "write"),
    ("writing", "write"),
    ("drove", "drive"),
    ("driving", "drive"),
    ("ate", "eat"),
    ("fell", "fall"),
    ("flew", "fly"),
    ("done", "do"),
    ("saw", "see"),
    ("heard", "hear"),
    ("led", "lead"),
    ("fed", "feed"),
    ("fled", "flee"),
    ("struck", "strike"),
    ("broke", "break"),
    ("broken", "break"),
    ("chose", "choose"),
    ("froze", "freeze"),
    ("frozen", "freeze"),
    ("rose", "rise"),
    ("rising", "rise"),
    ("sought", "seek"),
    ("taught", "teach"),
    ("caught", "catch"),
    ("fought", "fight"),
    ("began", "begin"),
    ("begun", "begin"),
    ("died", "die"),
    ("dying", "die"),
    ("added", "add"),
    ("adding", "add"),
    ("used", "use"),
    ("using", "use"),
    ("moved", "move"),
    ("moving", "move"),
    ("caused", "cause"),
    ("causing", "cause"),
    ("received", "receive"),
    ("receiving", "receive"),
    ("provided", "provide"),
    ("providing", "provide"),
    ("required", "require"),
    ("requiring", "require"),
    ("arrived", "arrive"),
    ("arriving", "arrive"),
    ("managed", "manage"),
    ("managing", "manage"),
    ("damaged", "damage"),
    ("saved", "save"),
    ("saving", "save"),
    ("shared", "share"),
    ("sharing", "share"),
    ("served", "serve"),
    ("serving", "serve"),
    ("closed", "close"),
    ("closing", "close"),
    ("continued", "continue"),
    ("noticed", "notice"),
    ("forced", "force"),
    ("escaped", "escape"),
    ("rescued", "rescue"),
    ("evacuated", "evacuate"),
    ("donated", "donate"),
    ("located", "locate"),
    ("isolated", "isolate"),
    ("injured", "injure"),
    ("collapsed", "collapse"),
    ("collapsing", "collapse"),
    ("polluted", "pollute"),
    ("starving", "starve"),
    ("shaking", "shake"),
    ("clothing", "clothe"),
    ("morning", "morning"),
    ("evening", "evening"),
    ("everything", "everything"),
    ("anything", "anything"),
    ("something", "something"),
    ("nothing", "nothing"),
    ("thing", "thing"),
    ("spring", "spring"),
    ("string", "string"),
    ("lightning", "lightning"),
    ("hundred", "hundred"),
];

/// Plural detachments tried in order: (suffix, replacement, minimum stem length).
const NOUN_SUFFIX_RULES: &[(&str, &str, usize)] = &[
    ("sses", "ss", 1),
    ("ies", "y", 2),
    ("ches", "ch", 2),
    ("shes", "sh", 2),
    ("xes", "x", 2),
];

/// Strip a plural suffix from `word`, or return `None` if no rule applies.
pub(super) fn apply_noun_rules(word: &str) -> Option<String> {
    for (suffix, replacement, min_stem) in NOUN_SUFFIX_RULES {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.len() >= *min_stem {
                return Some(format!("{stem}{replacement}"));
            }
        }
    }
    if word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return Some(word[..word.len() - 1].to_string());
    }
    None
}

/// Strip a verb inflection from `word`, or return `None` if no rule applies.
pub(super) fn apply_verb_rules(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return Some(format!("{stem}y"));
        }
    }
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.len() >= 2 {
            return Some(format!("{stem}y"));
        }
    }
    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() >= 3 {
            return Some(undouble(stem));
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if stem.len() >= 3 {
            return Some(undouble(stem));
        }
    }
    if word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return Some(word[..word.len() - 1].to_string());
    }
    None
}

/// Collapse a consonant doubled by suffixation ("stopp" -> "stop").
///
/// Only consonants English doubles before -ed/-ing are collapsed; l, s, z
/// and f are excluded because stems ending in those pairs are usually the
/// base form ("kill", "miss", "buzz", "stuff").
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    if bytes.len() >= 2 {
        let last = bytes[bytes.len() - 1];
        if last == bytes[bytes.len() - 2]
            && matches!(last, b'b' | b'd' | b'g' | b'm' | b'n' | b'p' | b'r' | b't')
        {
            return stem[..stem.len() - 1].to_string();
        }
    }
    stem.to_string()
}
