//! Payroll calculation
//!
//! Overtime is paid at 1.5x the hourly rate, where the hourly rate assumes
//! 8-hour working days. Unpaid leave is deducted at the daily rate.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::{all_finite, round_to};

const HOURS_PER_DAY: f64 = 8.0;
const OVERTIME_MULTIPLIER: f64 = 1.5;

/// Variable pay and deductions for one pay period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollInput {
    pub overtime_hours: f64,
    pub unpaid_leaves: u32,
    pub bonus: f64,
    pub allowances: f64,
    pub tax: f64,
    pub insurance: f64,
    pub provident_fund: f64,
    pub loan_repayment: f64,
    pub other_deductions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    pub base_salary: f64,
    pub overtime_amount: f64,
    pub leave_deduction: f64,
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub net_salary: f64,
}

/// Compute gross and net pay for a monthly base salary
pub fn calculate(
    base_salary: f64,
    working_days: u32,
    input: &PayrollInput,
) -> Result<PayrollBreakdown> {
    if working_days == 0 {
        return Err(Error::InvalidInput(
            "working days must be positive".to_string(),
        ));
    }
    let amounts = [
        base_salary,
        input.overtime_hours,
        input.bonus,
        input.allowances,
        input.tax,
        input.insurance,
        input.provident_fund,
        input.loan_repayment,
        input.other_deductions,
    ];
    if !all_finite(&amounts) {
        return Err(Error::InvalidInput(
            "payroll amounts must be finite numbers".to_string(),
        ));
    }

    let daily_rate = base_salary / working_days as f64;
    let overtime_rate = daily_rate / HOURS_PER_DAY * OVERTIME_MULTIPLIER;
    let overtime_amount = overtime_rate * input.overtime_hours;
    let leave_deduction = daily_rate * input.unpaid_leaves as f64;

    let gross_salary = base_salary + overtime_amount + input.bonus + input.allowances;
    let total_deductions = input.tax
        + input.insurance
        + input.provident_fund
        + input.loan_repayment
        + input.other_deductions
        + leave_deduction;

    Ok(PayrollBreakdown {
        base_salary: round_to(base_salary, 2),
        overtime_amount: round_to(overtime_amount, 2),
        leave_deduction: round_to(leave_deduction, 2),
        gross_salary: round_to(gross_salary, 2),
        total_deductions: round_to(total_deductions, 2),
        net_salary: round_to(gross_salary - total_deductions, 2),
    })
}
