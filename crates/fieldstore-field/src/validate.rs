//! Validation engine
//!
//! The only place where a field's type is interpreted. Raw input goes in, the
//! canonical string that gets stored comes out.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::prelude::*;
use fieldstore_types::field_adapter::{FieldData, FieldType};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Significant digits a stored number can carry
const MAX_DIGITS: u32 = 28;

fn mismatch(expected: &str) -> Error {
	Error::validation("value", format!("type mismatch: expected {}", expected))
}

/// Split a plain decimal literal into sign, integer and fraction digits
fn split_decimal(literal: &str) -> Option<(bool, &str, &str)> {
	let (negative, unsigned) = match literal.as_bytes().first() {
		Some(b'-') => (true, &literal[1..]),
		Some(b'+') => (false, &literal[1..]),
		_ => (false, literal),
	};
	let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

	let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
	if (int.is_empty() && frac.is_empty()) || !digits(int) || !digits(frac) {
		return None;
	}
	Some((negative, int, frac))
}

/// Multiply by `10^exponent` without rounding
fn shift_decimal(mut value: Decimal, exponent: i32) -> Option<Decimal> {
	let scale = i64::from(value.scale()) - i64::from(exponent);
	if scale >= 0 {
		value.set_scale(u32::try_from(scale).ok()?).ok()?;
		return Some(value);
	}

	// Any non-zero mantissa overflows past this
	if -scale > i64::from(MAX_DIGITS) {
		return None;
	}
	value.set_scale(0).ok()?;
	(0..-scale).try_fold(value, |acc, _| acc.checked_mul(Decimal::TEN))
}

/// Exact canonical form of a numeric literal.
///
/// Accepts an optional sign, digits with an optional fraction and an optional
/// exponent. Values that need more than 28 significant digits are rejected
/// rather than rounded.
fn canonical_number(raw: &str) -> ClResult<Box<str>> {
	let (mantissa, exponent) = match raw.find(['e', 'E']) {
		Some(pos) => (&raw[..pos], Some(&raw[pos + 1..])),
		None => (raw, None),
	};
	let (negative, int, frac) = split_decimal(mantissa).ok_or_else(|| mismatch("a number"))?;
	let exponent = match exponent {
		Some(exp) => exp.parse::<i32>().map_err(|_| mismatch("a number"))?,
		None => 0,
	};

	// Leading and trailing zeros carry no value
	let int = int.trim_start_matches('0');
	let frac = frac.trim_end_matches('0');
	if int.is_empty() && frac.trim_start_matches('0').is_empty() {
		return Ok("0".into());
	}

	let plain = format!(
		"{}{}{}{}",
		if negative { "-" } else { "" },
		if int.is_empty() { "0" } else { int },
		if frac.is_empty() { "" } else { "." },
		frac
	);
	let value = Decimal::from_str_exact(&plain)
		.ok()
		.and_then(|value| shift_decimal(value, exponent))
		.ok_or_else(|| mismatch("a number of at most 28 significant digits"))?;

	Ok(value.normalize().to_string().into())
}

fn canonical_date(raw: &str) -> ClResult<Box<str>> {
	let bytes = raw.as_bytes();
	let shape_ok = bytes.len() == 10
		&& bytes.iter().enumerate().all(|(i, b)| match i {
			4 | 7 => *b == b'-',
			_ => b.is_ascii_digit(),
		});
	if !shape_ok {
		return Err(mismatch("a date (YYYY-MM-DD)"));
	}

	NaiveDate::parse_from_str(raw, DATE_FORMAT)
		.map(|date| date.format(DATE_FORMAT).to_string().into())
		.map_err(|_| mismatch("an existing calendar date"))
}

fn canonical_boolean(raw: &str) -> ClResult<Box<str>> {
	match raw.to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok("true".into()),
		"false" | "0" | "no" | "off" => Ok("false".into()),
		_ => Err(mismatch("a boolean")),
	}
}

fn canonical_choice(options: Option<&str>, raw: &str) -> ClResult<Box<str>> {
	let choices: Vec<String> = options
		.and_then(|opts| serde_json::from_str(opts).ok())
		.ok_or_else(|| Error::validation("value", "dropdown options are missing or invalid"))?;

	if choices.iter().any(|choice| choice == raw) {
		Ok(raw.into())
	} else {
		Err(mismatch(&format!("one of {}", choices.join(", "))))
	}
}

/// Check `raw` against a field's type and return its canonical form
pub fn validate_value(typ: FieldType, options: Option<&str>, raw: &str) -> ClResult<Box<str>> {
	match typ {
		FieldType::Text => Ok(raw.into()),
		FieldType::Number => canonical_number(raw),
		FieldType::Date => canonical_date(raw),
		FieldType::Boolean => canonical_boolean(raw),
		FieldType::Dropdown => canonical_choice(options, raw),
	}
}

/// Check the attributes of a definition create or replace request
pub fn validate_definition<'a>(
	name: Option<&'a str>,
	typ: Option<&str>,
	options: Option<&'a str>,
) -> ClResult<FieldData<'a>> {
	let name = match name {
		Some(name) if !name.trim().is_empty() => name,
		_ => return Err(Error::validation("name", "required")),
	};
	let typ = typ.ok_or_else(|| Error::validation("type", "required"))?.parse::<FieldType>()?;

	Ok(FieldData { name, typ, options })
}


// vim: ts=4
