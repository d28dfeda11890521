use copurchase_core::{CustomerId, DomainError, DomainResult};

/// A pasted order block split into its customer and the order text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastedOrder {
    pub customer: CustomerId,
    pub body: String,
}

/// Work out whose order a pasted block is.
///
/// With a `current` customer the whole text is the order body. Without one,
/// the first non-blank line names the customer and the remaining lines are
/// the body. Fails with `Validation` when no customer can be determined.
pub fn split_customer(text: &str, current: Option<&CustomerId>) -> DomainResult<PastedOrder> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    if let Some(customer) = current {
        return Ok(PastedOrder {
            customer: customer.clone(),
            body: normalized,
        });
    }

    let mut lines = normalized.lines().filter(|l| !l.trim().is_empty());
    let first = lines
        .next()
        .ok_or_else(|| DomainError::validation("pasted text has no customer line"))?;
    let customer = CustomerId::parse(first)?;
    let body = lines.collect::<Vec<_>>().join("\n");

    Ok(PastedOrder { customer, body })
}

/// Split text into blocks separated by one or more blank lines.
pub fn split_blocks(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_names_the_customer() {
        let pasted = split_customer("\n  Маша \r\nКаперсы 100 г 250 - 1шт\r\n", None).unwrap();
        assert_eq!(pasted.customer.as_str(), "Маша");
        assert_eq!(pasted.body, "Каперсы 100 г 250 - 1шт");
    }

    #[test]
    fn current_customer_keeps_whole_body() {
        let current = CustomerId::parse("Оля").unwrap();
        let pasted = split_customer("Маша\nКаперсы 100 г 250 - 1шт", Some(&current)).unwrap();
        assert_eq!(pasted.customer, current);
        assert!(pasted.body.starts_with("Маша"));
    }

    #[test]
    fn blank_text_has_no_customer() {
        assert!(matches!(split_customer(" \n\n", None), Err(DomainError::Validation(_))));
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        let blocks = split_blocks("Маша\nа 1 г 1\n\n\nОля\r\nб 2 г 2\n");
        assert_eq!(blocks, vec!["Маша\nа 1 г 1".to_string(), "Оля\nб 2 г 2".to_string()]);
        assert!(split_blocks("  \n").is_empty());
    }
}
