use async_trait::async_trait;
use chrono::NaiveDate;
use clinicly_core::{
    errors::ClinicResult,
    models::{
        appointment::{Appointment, AppointmentDetails, NewAppointment},
        clinic::Clinic,
        doctor::{Doctor, NewDoctor},
        patient::{NewPatient, Patient},
        user::{PlanActivation, SessionUser},
    },
    repositories::{
        AppointmentRepository, ClinicRepository, DoctorRepository, PatientRepository,
        UserRepository,
    },
};
use mockall::mock;
use uuid::Uuid;

// Mock store for interaction tests
mock! {
    pub Store {}

    #[async_trait]
    impl ClinicRepository for Store {
        async fn create_clinic(&self, user_id: &str, name: &str) -> ClinicResult<Clinic>;
    }

    #[async_trait]
    impl DoctorRepository for Store {
        async fn get_doctor(&self, id: Uuid) -> ClinicResult<Option<Doctor>>;
        async fn list_doctors(&self, clinic_id: Uuid) -> ClinicResult<Vec<Doctor>>;
        async fn insert_doctor(&self, doctor: NewDoctor) -> ClinicResult<Doctor>;
        async fn update_doctor(&self, id: Uuid, doctor: NewDoctor) -> ClinicResult<Doctor>;
        async fn delete_doctor(&self, id: Uuid) -> ClinicResult<()>;
    }

    #[async_trait]
    impl PatientRepository for Store {
        async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>>;
        async fn list_patients(&self, clinic_id: Uuid) -> ClinicResult<Vec<Patient>>;
        async fn insert_patient(&self, patient: NewPatient) -> ClinicResult<Patient>;
        async fn update_patient(&self, id: Uuid, patient: NewPatient) -> ClinicResult<Patient>;
        async fn delete_patient(&self, id: Uuid) -> ClinicResult<()>;
    }

    #[async_trait]
    impl AppointmentRepository for Store {
        async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>>;
        async fn list_appointments(&self, clinic_id: Uuid) -> ClinicResult<Vec<AppointmentDetails>>;
        async fn list_doctor_appointments_on(
            &self,
            doctor_id: Uuid,
            date: NaiveDate,
        ) -> ClinicResult<Vec<Appointment>>;
        async fn insert_appointment(&self, appointment: NewAppointment) -> ClinicResult<Appointment>;
        async fn update_appointment(
            &self,
            id: Uuid,
            appointment: NewAppointment,
        ) -> ClinicResult<Appointment>;
        async fn delete_appointment(&self, id: Uuid) -> ClinicResult<()>;
    }

    #[async_trait]
    impl UserRepository for Store {
        async fn find_session_user(&self, token: &str) -> ClinicResult<Option<SessionUser>>;
        async fn activate_plan(&self, user_id: &str, activation: PlanActivation) -> ClinicResult<()>;
        async fn clear_plan(&self, user_id: &str) -> ClinicResult<()>;
    }
}
