mod common;

use anyhow::Result;
use common::{ALICE, MonthOne, payload, test_service};
use tallybook::domain::EntryKind;
use tallybook::io::Exporter;

#[tokio::test]
async fn test_summary_salary_and_rent() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let MonthOne { salary, rent } = MonthOne::record(&service, ALICE).await?;

    let summary = service.summarize(ALICE).await?;

    assert_eq!(summary.total_income, 500000);
    assert_eq!(summary.total_expenses, 120000);
    assert_eq!(summary.balance, 380000);

    // History: the 2024-01-02 expense comes first
    assert_eq!(summary.history.len(), 2);
    assert_eq!(summary.history[0].id, rent.id);
    assert_eq!(summary.history[1].id, salary.id);

    // Series: oldest first, one point per entry
    assert_eq!(summary.series.len(), 2);
    assert_eq!(summary.series[0].date.to_string(), "2024-01-01");
    assert_eq!(summary.series[0].kind, EntryKind::Income);
    assert_eq!(summary.series[1].amount, 120000);

    Ok(())
}

#[tokio::test]
async fn test_summary_json_shape() -> Result<()> {
    let (service, _temp) = test_service().await?;
    MonthOne::record(&service, ALICE).await?;

    let summary = service.summarize(ALICE).await?;
    let json = serde_json::to_value(&summary)?;

    assert_eq!(json["totalIncome"], 5000.0);
    assert_eq!(json["totalExpenses"], 1200.0);
    assert_eq!(json["balance"], 3800.0);
    assert_eq!(json["history"][0]["title"], "Rent");
    assert_eq!(json["history"][0]["ownerId"], ALICE);
    assert_eq!(json["series"][0]["date"], "2024-01-01");
    assert_eq!(json["series"][0]["amount"], 5000.0);

    Ok(())
}

#[tokio::test]
async fn test_empty_summary() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let summary = service.summarize(ALICE).await?;

    assert_eq!(summary.total_income, 0);
    assert_eq!(summary.total_expenses, 0);
    assert_eq!(summary.balance, 0);
    assert!(summary.history.is_empty());
    assert!(summary.series.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_balance_can_go_negative() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .add_income(ALICE, &payload(100.0, "Gift", "Family", "2024-01-01"))
        .await?;
    service
        .add_expense(ALICE, &payload(350.5, "Bike", "Transport", "2024-01-03"))
        .await?;

    let summary = service.summarize(ALICE).await?;
    assert_eq!(summary.balance, -25050);
    assert_eq!(
        summary.balance,
        summary.total_income - summary.total_expenses
    );

    Ok(())
}

#[tokio::test]
async fn test_summary_history_matches_store_order() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .add_income(ALICE, &payload(40.0, "Refund", "Shopping", "2024-03-01"))
        .await?;
    service
        .add_expense(ALICE, &payload(15.0, "Taxi", "Transport", "2024-03-01"))
        .await?;
    service
        .add_income(ALICE, &payload(25.0, "Cashback", "Shopping", "2024-03-01"))
        .await?;
    service
        .add_expense(ALICE, &payload(8.0, "Coffee", "Food", "2024-02-28"))
        .await?;

    let summary = service.summarize(ALICE).await?;
    let listed = service.list_all(ALICE).await?;

    let history_ids: Vec<_> = summary.history.iter().map(|e| e.id).collect();
    let listed_ids: Vec<_> = listed.iter().map(|e| e.id).collect();
    assert_eq!(history_ids, listed_ids);
    assert_eq!(summary.history[0].title, "Cashback");

    // Series is the same entries, oldest first
    let series_amounts: Vec<i64> = summary.series.iter().map(|p| p.amount).collect();
    assert_eq!(series_amounts, [800, 4000, 1500, 2500]);

    Ok(())
}

#[tokio::test]
async fn test_series_keeps_same_day_entries_apart() -> Result<()> {
    let (service, _temp) = test_service().await?;
    for amount in [10.0, 20.0, 30.0] {
        service
            .add_expense(ALICE, &payload(amount, "Snack", "Food", "2024-06-01"))
            .await?;
    }

    let summary = service.summarize(ALICE).await?;
    let amounts: Vec<i64> = summary.series.iter().map(|p| p.amount).collect();
    assert_eq!(amounts.len(), 3);
    assert_eq!(amounts.iter().sum::<i64>(), 6000);

    Ok(())
}

#[tokio::test]
async fn test_breakdown() -> Result<()> {
    let (service, _temp) = test_service().await?;
    MonthOne::record(&service, ALICE).await?;
    service
        .add_expense(ALICE, &payload(300.0, "Groceries", "Food", "2024-01-06"))
        .await?;
    service
        .add_expense(ALICE, &payload(500.0, "Dinner out", "Food", "2024-01-07"))
        .await?;

    let breakdown = service.breakdown(ALICE).await?;

    assert_eq!(breakdown.total_income, 500000);
    assert_eq!(breakdown.total_expenses, 200000);
    assert!((breakdown.income_percentage - 71.43).abs() < 0.01);
    assert!((breakdown.expense_percentage - 28.57).abs() < 0.01);

    assert_eq!(breakdown.income_categories.len(), 1);
    assert_eq!(breakdown.income_categories[0].percentage, 100.0);

    let housing = &breakdown.expense_categories[0];
    assert_eq!(housing.category, "Housing");
    assert_eq!(housing.total, 120000);
    let food = &breakdown.expense_categories[1];
    assert_eq!(food.category, "Food");
    assert_eq!(food.count, 2);
    assert_eq!(food.average, 40000);
    assert!((food.percentage - 40.0).abs() < 0.001);

    Ok(())
}

#[tokio::test]
async fn test_breakdown_of_empty_ledger_has_zero_shares() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let breakdown = service.breakdown(ALICE).await?;
    assert_eq!(breakdown.income_percentage, 0.0);
    assert_eq!(breakdown.expense_percentage, 0.0);
    assert!(breakdown.expense_categories.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_export_entries_csv() -> Result<()> {
    let (service, _temp) = test_service().await?;
    MonthOne::record(&service, ALICE).await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service, ALICE)
        .export_entries_csv(&mut buffer)
        .await?;
    assert_eq!(count, 2);

    let text = String::from_utf8(buffer)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,kind,date,amount"));
    assert!(lines[1].contains(",expense,2024-01-02,1200.00,Rent,Housing,"));
    assert!(lines[2].contains(",income,2024-01-01,5000.00,Salary,Job,"));

    Ok(())
}

#[tokio::test]
async fn test_export_summary_json() -> Result<()> {
    let (service, _temp) = test_service().await?;
    MonthOne::record(&service, ALICE).await?;

    let mut buffer = Vec::new();
    let summary = Exporter::new(&service, ALICE)
        .export_summary_json(&mut buffer)
        .await?;
    assert_eq!(summary.balance, 380000);

    let json: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(json["balance"], 3800.0);
    assert_eq!(json["history"].as_array().map(Vec::len), Some(2));

    Ok(())
}
