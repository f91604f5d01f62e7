/// Texto com case folding aplicado, guardando para cada caractere dobrado
/// o índice do caractere ORIGINAL de onde ele veio (to_lowercase pode
/// expandir um caractere em vários).
pub struct Folded {
    chars: Vec<char>,
    map: Vec<usize>,
}

pub fn fold(text: &str) -> Folded {
    let mut chars = Vec::with_capacity(text.len());
    let mut map = Vec::with_capacity(text.len());

    for (i, ch) in text.chars().enumerate() {
        for low in ch.to_lowercase() {
            chars.push(low);
            map.push(i);
        }
    }

    Folded { chars, map }
}

impl Folded {
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn same_text(&self, other: &Folded) -> bool {
        self.chars == other.chars
    }

    /// Primeira ocorrência de `needle` dentro de `self`.
    /// Retorna o intervalo em caracteres originais, [start, end).
    /// Uma janela que pega só parte da expansão de um caractere original
    /// (ex.: 'İ' dobra para dois chars) não conta como ocorrência.
    pub fn find(&self, needle: &Folded) -> Option<(usize, usize)> {
        if needle.chars.is_empty() || needle.chars.len() > self.chars.len() {
            return None;
        }

        let len = needle.chars.len();
        let last = self.chars.len() - len;
        for i in 0..=last {
            if self.chars[i..i + len] != needle.chars[..] {
                continue;
            }

            let starts_whole = i == 0 || self.map[i] != self.map[i - 1];
            let ends_whole = i + len == self.map.len() || self.map[i + len] != self.map[i + len - 1];
            if starts_whole && ends_whole {
                let start = self.map[i];
                let end = self.map[i + len - 1] + 1;
                return Some((start, end));
            }
        }

        None
    }

    pub fn contains(&self, needle: &Folded) -> bool {
        self.find(needle).is_some()
    }
}
