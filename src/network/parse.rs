use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

#[derive(Clone, Debug, Default)]
pub struct AppearanceTable {
    pub characters: Vec<String>,
    pub columns: Vec<Vec<bool>>,
}

impl AppearanceTable {
    pub fn column(&self, character: &str) -> Option<&[bool]> {
        self.characters
            .iter()
            .position(|name| name == character)
            .map(|index| self.columns[index].as_slice())
    }
}

pub fn read_appearance_table(path: &Path) -> Result<AppearanceTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open appearance table {}", path.display()))?;
    parse_appearance_table(file)
        .with_context(|| format!("failed to parse appearance table {}", path.display()))
}

pub fn parse_appearance_table(input: impl Read) -> Result<AppearanceTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();
    let characters = headers
        .iter()
        .skip(1)
        .map(|header| header.trim().to_owned())
        .collect::<Vec<_>>();
    if characters.is_empty() {
        return Err(anyhow!("appearance table has no character columns"));
    }

    let mut columns = vec![Vec::new(); characters.len()];
    for (row_index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("failed to read row {}", row_index + 1))?;
        for (column, character) in characters.iter().enumerate() {
            let cell = row.get(column + 1).map(str::trim).unwrap_or("");
            let appears = match cell {
                "1" | "1.0" | "True" | "true" => true,
                "0" | "0.0" | "False" | "false" | "" => false,
                other => {
                    return Err(anyhow!(
                        "row {} column {character:?} holds {other:?}, expected 0 or 1",
                        row_index + 1
                    ));
                }
            };
            columns[column].push(appears);
        }
    }

    Ok(AppearanceTable {
        characters,
        columns,
    })
}

pub fn read_character_colors(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open color table {}", path.display()))?;
    parse_character_colors(file)
        .with_context(|| format!("failed to parse color table {}", path.display()))
}

pub fn parse_character_colors(input: impl Read) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut colors = Vec::new();
    for (row_index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("failed to read color row {}", row_index + 1))?;
        let channel = |column: usize| -> Result<u8> {
            let raw = row
                .get(column)
                .map(str::trim)
                .ok_or_else(|| anyhow!("color row {} is missing column {column}", row_index + 1))?;
            raw.parse::<u8>()
                .with_context(|| format!("color row {} has invalid channel {raw:?}", row_index + 1))
        };
        let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);
        colors.push(format!("rgb({r}, {g}, {b})"));
    }
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_columns_after_the_row_identifier() {
        let raw = "comic,charlie brown,lucy\n1950-10-02,1,0\n1950-10-03,1,1\n";
        let table = parse_appearance_table(raw.as_bytes()).unwrap();
        assert_eq!(table.characters, vec!["charlie brown", "lucy"]);
        assert_eq!(table.column("charlie brown").unwrap(), &[true, true]);
        assert_eq!(table.column("lucy").unwrap(), &[false, true]);
        assert!(table.column("linus").is_none());
    }

    #[test]
    fn rejects_non_boolean_cells() {
        let raw = "comic,snoopy\n1,2\n";
        let error = parse_appearance_table(raw.as_bytes()).unwrap_err();
        assert!(error.to_string().contains("expected 0 or 1"));
    }

    #[test]
    fn formats_colors_as_css_rgb() {
        let raw = "name,r,g,b\ncharlie brown,255,204,0\nlucy,0,51,204\n";
        let colors = parse_character_colors(raw.as_bytes()).unwrap();
        assert_eq!(colors, vec!["rgb(255, 204, 0)", "rgb(0, 51, 204)"]);
    }
}
