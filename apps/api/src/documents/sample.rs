use chrono::{DateTime, Local};

/// Placeholder: {generated}
const SAMPLE_RECORDS_TEMPLATE: &str = "
DEPARTMENT OF VETERANS AFFAIRS MEDICAL RECORD
Generated: {generated}

PATIENT: Sample Veteran
DOB: January 1, 1970
SERVICE: Army (1990-1995)

CURRENT SERVICE-CONNECTED CONDITIONS:
1. PTSD - 70% Rating (Diagnostic Code 9411)
2. Bilateral Hearing Loss - 10% Each Ear (Diagnostic Code 6100)
3. Hypertension - 10% Rating (Diagnostic Code 7101)
4. Lumbar Spine Condition - 20% Rating (Diagnostic Code 5243)

RECENT MEDICAL NOTES:
- Veteran reports increased PTSD symptoms including nightmares, hypervigilance
- Sleep disturbances documented, averaging 3-4 hours per night
- Social isolation worsening, difficulty maintaining employment
- Panic attacks in crowded situations reported
- Depression symptoms noted by mental health provider
- Sleep apnea symptoms documented but not yet studied

MEDICATIONS:
- Sertraline 100mg daily for depression/anxiety
- Prazosin 2mg for nightmares
- Trazodone as needed for sleep
- Lisinopril for hypertension

TREATMENT HISTORY:
- Regular mental health appointments
- Group therapy participation intermittent
- Sleep study recommended but not yet completed
- Functional capacity evaluation pending

PROVIDER ASSESSMENTS:
- \"Veteran demonstrates significant occupational and social impairment\"
- \"PTSD symptoms appear to be worsening despite treatment\"
- \"Consider sleep study for potential sleep apnea secondary to PTSD\"
- \"Depression appears to be secondary to PTSD\"
";

/// Stand-in medical record used by `/analyze-sample` and when a download fails.
pub fn sample_medical_records(now: DateTime<Local>) -> String {
    SAMPLE_RECORDS_TEMPLATE.replace("{generated}", &now.format("%B %d, %Y").to_string())
}
