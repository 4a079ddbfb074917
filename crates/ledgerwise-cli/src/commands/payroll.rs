//! Payroll command

use anyhow::Result;
use ledgerwise_core::models::format_money;
use ledgerwise_core::{payroll, PayrollInput};

use super::print_json;

pub fn cmd_payroll(
    base_salary: f64,
    working_days: u32,
    input: &PayrollInput,
    json: bool,
) -> Result<()> {
    let pay = payroll::calculate(base_salary, working_days, input)?;

    if json {
        return print_json(&pay);
    }

    println!();
    println!("💵 Payroll");
    println!("   Base salary:      {:>14}", format_money(pay.base_salary));
    println!(
        "   Overtime ({} hrs): {:>14}",
        input.overtime_hours,
        format_money(pay.overtime_amount)
    );
    println!("   Bonus:            {:>14}", format_money(input.bonus));
    println!("   Allowances:       {:>14}", format_money(input.allowances));
    println!("   Gross salary:     {:>14}", format_money(pay.gross_salary));
    println!("   ─────────────────────────────────");
    println!("   Leave deduction:  {:>14}", format_money(pay.leave_deduction));
    println!("   Total deductions: {:>14}", format_money(pay.total_deductions));
    println!("   ─────────────────────────────────");
    println!("   Net salary:       {:>14}", format_money(pay.net_salary));
    Ok(())
}
