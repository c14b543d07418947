//! Field validators shared by the forms. Each returns the cleaned value.

pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// CPF with check digits; punctuation is accepted and stripped.
pub fn cpf(raw: &str) -> Result<String, String> {
    let d = digits(raw);
    if d.len() != 11 {
        return Err("deve ter 11 dígitos".to_string());
    }
    let nums: Vec<u32> = d.chars().filter_map(|c| c.to_digit(10)).collect();
    if nums.iter().all(|n| *n == nums[0]) {
        return Err("inválido".to_string());
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = nums[..len]
            .iter()
            .enumerate()
            .map(|(i, n)| n * (len as u32 + 1 - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 {
            0
        } else {
            rest
        }
    };

    if check(9) != nums[9] || check(10) != nums[10] {
        return Err("inválido".to_string());
    }
    Ok(d)
}

pub fn cns(raw: &str) -> Result<String, String> {
    let d = digits(raw);
    if d.len() != 15 {
        return Err("deve ter 15 dígitos".to_string());
    }
    Ok(d)
}

pub fn zip_code(raw: &str) -> Result<String, String> {
    let d = digits(raw);
    if d.len() != 8 {
        return Err("deve ter 8 dígitos".to_string());
    }
    Ok(d)
}

/// `None` for blank input.
pub fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Numeric input as typed by users: blank is `None`, `,` is a decimal separator.
pub fn decimal(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(Some)
        .ok_or_else(|| format!("{:?} não é um número válido", trimmed))
}

pub fn whole(raw: &str) -> Result<Option<u32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| format!("{:?} não é um número inteiro válido", trimmed))
}
